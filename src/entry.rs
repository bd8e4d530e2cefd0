use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::WheelError;

pub const DEFAULT_SPIN_DURATION_SECS: u32 = 3;
pub const DEFAULT_ENTRY_COUNT: usize = 10;
pub const DEFAULT_WEIGHT: u32 = 1;
/// A spin needs at least this many segments.
pub const MIN_ENTRIES: usize = 2;

static RE_WEIGHTED_LINE: OnceLock<Regex> = OnceLock::new();

// "label: 3" or "label | 3"; the weight may carry a sign so negatives can be clamped.
fn weighted_line_regex() -> &'static Regex {
    RE_WEIGHTED_LINE.get_or_init(|| {
        Regex::new(r"^(?P<label>.*?)\s*[:|]\s*(?P<weight>[+-]?\d+)$").expect("static regex")
    })
}

/// One labeled, weighted wedge of the wheel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub label: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    DEFAULT_WEIGHT
}

impl Entry {
    pub fn new(label: impl Into<String>, weight: u32) -> Self {
        Self { label: label.into(), weight }
    }

    pub fn unit(label: impl Into<String>) -> Self {
        Self::new(label, DEFAULT_WEIGHT)
    }

    pub fn is_eligible(&self) -> bool {
        self.weight > 0
    }

    /// Take one unit of stock. Returns the remaining weight.
    pub fn deplete(&mut self) -> u32 {
        self.weight = self.weight.saturating_sub(1);
        self.weight
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelConfig {
    pub entries: Vec<Entry>,
    #[serde(default = "default_duration")]
    pub spin_duration_secs: u32,
}

fn default_duration() -> u32 {
    DEFAULT_SPIN_DURATION_SECS
}

impl WheelConfig {
    pub fn new(entries: Vec<Entry>, spin_duration_secs: u32) -> Self {
        Self { entries, spin_duration_secs }
    }

    pub fn total_weight(&self) -> u64 {
        total_weight(&self.entries)
    }

    /// Checks the rules a configuration must satisfy before it may replace the active one.
    pub fn validate(&self) -> Result<(), WheelError> {
        if self.entries.len() < MIN_ENTRIES {
            return Err(WheelError::InvalidConfiguration(format!(
                "at least {} items are required, got {}",
                MIN_ENTRIES,
                self.entries.len()
            )));
        }
        if self.spin_duration_secs == 0 {
            return Err(WheelError::InvalidConfiguration(
                "spin duration must be at least 1 second".into(),
            ));
        }
        Ok(())
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }
}

impl Default for WheelConfig {
    fn default() -> Self {
        let entries = (1..=DEFAULT_ENTRY_COUNT).map(|i| Entry::unit(i.to_string())).collect();
        Self::new(entries, DEFAULT_SPIN_DURATION_SECS)
    }
}

pub fn total_weight(entries: &[Entry]) -> u64 {
    entries.iter().map(|e| u64::from(e.weight)).sum()
}

/// Parse one settings line. Blank lines yield `None`.
pub fn parse_entry_line(line: &str) -> Option<Entry> {
    let s = line.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(caps) = weighted_line_regex().captures(s)
        && let (Some(label), Some(weight)) = (caps.name("label"), caps.name("weight"))
        && !label.as_str().is_empty()
    {
        let weight = match weight.as_str().parse::<i64>() {
            Ok(w) => w.clamp(0, i64::from(u32::MAX)) as u32,
            Err(_) => DEFAULT_WEIGHT,
        };
        return Some(Entry::new(label.as_str(), weight));
    }
    Some(Entry::unit(s))
}

/// Parse the free-form settings text: one entry per line, blanks skipped.
pub fn parse_entries(text: &str) -> Vec<Entry> {
    text.lines().filter_map(parse_entry_line).collect()
}

/// Inverse of `parse_entries`, used to prefill the settings editor.
pub fn format_entries(entries: &[Entry]) -> String {
    entries
        .iter()
        .map(|e| if e.weight == DEFAULT_WEIGHT { e.label.clone() } else { format!("{}: {}", e.label, e.weight) })
        .collect::<Vec<_>>()
        .join("\n")
}
