use serde::Deserialize;
use std::cell::RefCell;
use std::collections::HashMap;
#[cfg(any(feature = "cli", test))]
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::WheelError;
use crate::entry::{DEFAULT_SPIN_DURATION_SECS, DEFAULT_WEIGHT, Entry, WheelConfig};

pub const CONFIG_KEY: &str = "lucky_wheel.config";
/// Keys the browser-only widget wrote to localStorage: a JSON label array and the
/// duration as a plain number string.
pub const ORIGINAL_ITEMS_KEY: &str = "luckySpinItems";
pub const ORIGINAL_DURATION_KEY: &str = "luckySpinDuration";

/// Key-value persistence the wheel is stored in (a JSON file, browser localStorage, ...).
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, WheelError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), WheelError>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, WheelError> {
        (**self).get(key)
    }
    fn set(&mut self, key: &str, value: &str) -> Result<(), WheelError> {
        (**self).set(key, value)
    }
}

/// In-process storage. Clones share the same map, so a test can keep a handle and
/// inspect what the controller persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    map: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.map.borrow().get(key).cloned()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, WheelError> {
        Ok(self.raw(key))
    }
    fn set(&mut self, key: &str, value: &str) -> Result<(), WheelError> {
        self.map.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// All keys live in one pretty-printed JSON object on disk.
#[cfg(any(feature = "cli", test))]
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

#[cfg(any(feature = "cli", test))]
impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the backing file. A missing file is not an error.
    pub fn reset(&self) -> Result<(), WheelError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn read_all(&self) -> Result<HashMap<String, String>, WheelError> {
        match std::fs::read_to_string(&self.path) {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(any(feature = "cli", test))]
impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, WheelError> {
        Ok(self.read_all()?.remove(key))
    }
    fn set(&mut self, key: &str, value: &str) -> Result<(), WheelError> {
        let mut all = self.read_all()?;
        all.insert(key.to_string(), value.to_string());
        std::fs::write(&self.path, serde_json::to_string_pretty(&all)?)?;
        Ok(())
    }
}

// Older saves kept a plain list of labels; newer ones the full config.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Weighted(Entry),
    Label(String),
}

impl From<StoredEntry> for Entry {
    fn from(s: StoredEntry) -> Self {
        match s {
            StoredEntry::Weighted(e) => e,
            StoredEntry::Label(label) => Entry::new(label, DEFAULT_WEIGHT),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredConfig {
    Full { entries: Vec<StoredEntry>, spin_duration_secs: Option<u32> },
    Labels(Vec<StoredEntry>),
}

/// Loads and saves the wheel configuration through a `Storage`.
#[derive(Debug, Clone)]
pub struct EntryStore<S: Storage> {
    storage: S,
}

impl<S: Storage> EntryStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// `Ok(None)` when nothing has been saved yet, under either key layout.
    pub fn load(&self) -> Result<Option<WheelConfig>, WheelError> {
        let raw = match self.storage.get(CONFIG_KEY)? {
            Some(raw) => raw,
            None => match self.storage.get(ORIGINAL_ITEMS_KEY)? {
                Some(raw) => raw,
                None => return Ok(None),
            },
        };
        let (entries, duration) = match serde_json::from_str::<StoredConfig>(&raw)? {
            StoredConfig::Full { entries, spin_duration_secs } => (entries, spin_duration_secs),
            StoredConfig::Labels(entries) => (entries, None),
        };
        let duration = match duration {
            Some(d) => d,
            None => self.legacy_duration()?,
        };
        Ok(Some(WheelConfig::new(entries.into_iter().map(Entry::from).collect(), duration)))
    }

    /// Stored config, or the built-in default when absent, unreadable or invalid.
    /// A zero duration alone is repaired rather than discarding the items.
    pub fn load_or_default(&self) -> WheelConfig {
        let mut config = match self.load() {
            Ok(Some(config)) => config,
            Ok(None) => return WheelConfig::default(),
            Err(e) => {
                tracing::warn!(error = %e, "stored wheel config unreadable, using defaults");
                return WheelConfig::default();
            }
        };
        if config.spin_duration_secs == 0 {
            tracing::warn!(default = DEFAULT_SPIN_DURATION_SECS, "stored spin duration is zero, using default");
            config.spin_duration_secs = DEFAULT_SPIN_DURATION_SECS;
        }
        match config.validate() {
            Ok(()) => config,
            Err(e) => {
                tracing::warn!(error = %e, "stored wheel config invalid, using defaults");
                WheelConfig::default()
            }
        }
    }

    pub fn save(&mut self, config: &WheelConfig) -> Result<(), WheelError> {
        self.storage.set(CONFIG_KEY, &serde_json::to_string(config)?)
    }

    fn legacy_duration(&self) -> Result<u32, WheelError> {
        let parsed = self
            .storage
            .get(ORIGINAL_DURATION_KEY)?
            .and_then(|d| d.trim().trim_matches('"').parse::<u32>().ok())
            .filter(|d| *d > 0);
        Ok(parsed.unwrap_or(DEFAULT_SPIN_DURATION_SECS))
    }
}
