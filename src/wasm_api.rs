use serde::Serialize;
use std::time::Duration;
use wasm_bindgen::prelude::*;

use crate::entry::{Entry, WheelConfig};
use crate::rng::{SeededRandom, ThreadRandom};
use crate::selector::SelectionPolicy;
use crate::spin::{SpinController, WheelDisplay};
use crate::store::{CONFIG_KEY, EntryStore, MemoryStorage, ORIGINAL_DURATION_KEY, ORIGINAL_ITEMS_KEY, Storage};
use crate::timer::SpinId;
use crate::WheelError;

/// What the page has to do next, drained after every call.
#[derive(Serialize, Clone, Debug)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayEvent {
    Animate { degrees: f64, duration_secs: f64 },
    Result { label: String },
    Redraw { entries: Vec<Entry> },
    Notice { message: String },
}

#[derive(Default)]
pub struct BrowserDisplay {
    events: Vec<DisplayEvent>,
}

impl WheelDisplay for BrowserDisplay {
    fn animate_rotation(&mut self, degrees: f64, duration: Duration) {
        self.events.push(DisplayEvent::Animate { degrees, duration_secs: duration.as_secs_f64() });
    }
    fn show_result(&mut self, label: &str) {
        self.events.push(DisplayEvent::Result { label: label.to_string() });
    }
    fn redraw(&mut self, entries: &[Entry]) {
        self.events.push(DisplayEvent::Redraw { entries: entries.to_vec() });
    }
    fn notify(&mut self, error: &WheelError) {
        self.events.push(DisplayEvent::Notice { message: error.to_string() });
    }
}

#[derive(Serialize)]
struct WasmWheelState<'a> {
    entries: &'a [Entry],
    spin_duration_secs: u32,
    rotation_degrees: f64,
    spinning: bool,
    mode: SelectionPolicy,
}

#[derive(Serialize)]
struct CallResult<T: Serialize> {
    ok: bool,
    value: Option<T>,
    error: Option<String>,
    events: Vec<DisplayEvent>,
}

fn to_js<T: Serialize>(v: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(v).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// The page owns localStorage: it passes the saved JSON in and reads `export_config` back.
#[wasm_bindgen]
pub struct LuckyWheel {
    storage: MemoryStorage,
    inner: SpinController<MemoryStorage, BrowserDisplay>,
}

#[wasm_bindgen]
impl LuckyWheel {
    /// `saved` is whatever the page stored from `export_config`. `original_items` and
    /// `original_duration` are the old widget's `luckySpinItems` / `luckySpinDuration`
    /// values, read when `saved` is missing. `mode` is "uniform", "weighted" or "depleting".
    #[wasm_bindgen(constructor)]
    pub fn new(
        saved: Option<String>,
        original_items: Option<String>,
        original_duration: Option<String>,
        mode: &str,
        seed: Option<u64>,
    ) -> Result<LuckyWheel, JsValue> {
        let policy: SelectionPolicy = mode.parse().map_err(|e: WheelError| JsValue::from_str(&e.to_string()))?;
        let mut storage = MemoryStorage::new();
        for (key, value) in [(CONFIG_KEY, saved), (ORIGINAL_ITEMS_KEY, original_items), (ORIGINAL_DURATION_KEY, original_duration)] {
            if let Some(raw) = value {
                storage.set(key, &raw).map_err(|e| JsValue::from_str(&e.to_string()))?;
            }
        }
        let inner = SpinController::new(EntryStore::new(storage.clone()), BrowserDisplay::default()).with_policy(policy);
        let inner = match seed {
            Some(s) => inner.with_rng(SeededRandom::new(s)),
            None => inner.with_rng(ThreadRandom),
        };
        Ok(LuckyWheel { storage, inner })
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        let c: &WheelConfig = self.inner.config();
        to_js(&WasmWheelState {
            entries: &c.entries,
            spin_duration_secs: c.spin_duration_secs,
            rotation_degrees: self.inner.rotation().cumulative_degrees,
            spinning: self.inner.is_spinning(),
            mode: self.inner.policy(),
        })
    }

    /// JSON to put in localStorage, if anything has been saved.
    pub fn export_config(&self) -> Option<String> {
        self.storage.raw(CONFIG_KEY)
    }

    /// Start a spin; `now_ms` is `performance.now()`.
    pub fn spin(&mut self, now_ms: f64) -> Result<JsValue, JsValue> {
        let r = self.inner.request_spin(ms(now_ms));
        self.respond(r)
    }

    /// Call from a timer or animation frame; completes the spin once its time is up.
    pub fn poll(&mut self, now_ms: f64) -> Result<JsValue, JsValue> {
        let r = Ok(self.inner.poll(ms(now_ms)));
        self.respond(r)
    }

    /// Complete a spin from the page's `transitionend` handler.
    pub fn complete(&mut self, spin_id: u64) -> Result<JsValue, JsValue> {
        let r = self.inner.complete(SpinId(spin_id));
        self.respond(r)
    }

    /// Save the settings textarea and duration input.
    pub fn save_settings(&mut self, text: &str, duration_secs: u32) -> Result<JsValue, JsValue> {
        let r = self.inner.apply_settings_text(text, duration_secs);
        self.respond(r)
    }

    pub fn replenish(&mut self, index: usize, weight: u32) -> Result<JsValue, JsValue> {
        let r = self.inner.replenish(index, weight);
        self.respond(r)
    }
}

impl LuckyWheel {
    fn respond<T: Serialize>(&mut self, r: Result<T, WheelError>) -> Result<JsValue, JsValue> {
        let events = std::mem::take(&mut self.inner.display_mut().events);
        let out = match r {
            Ok(v) => CallResult { ok: true, value: Some(v), error: None, events },
            Err(e) => CallResult { ok: false, value: None, error: Some(e.to_string()), events },
        };
        to_js(&out)
    }
}

fn ms(now_ms: f64) -> Duration {
    if now_ms.is_finite() && now_ms > 0.0 { Duration::from_secs_f64(now_ms / 1000.0) } else { Duration::ZERO }
}
