use serde::Serialize;
use std::time::Duration;

use crate::angle::{DEFAULT_EXTRA_TURNS, RotationState, clamp_extra_turns};
use crate::entry::{Entry, MIN_ENTRIES, WheelConfig, parse_entries};
use crate::rng::{RandomSource, ThreadRandom};
use crate::selector::SelectionPolicy;
use crate::store::{EntryStore, Storage};
use crate::timer::{SpinId, SpinTimer};
use crate::{WheelError, apply_depletion};

/// Whatever draws the wheel and shows the result.
pub trait WheelDisplay {
    /// Rotate to `degrees` (cumulative, clockwise) over `duration`.
    fn animate_rotation(&mut self, degrees: f64, duration: Duration);
    fn show_result(&mut self, label: &str);
    fn redraw(&mut self, entries: &[Entry]);
    /// A user-visible rejection (invalid settings, depleted wheel).
    fn notify(&mut self, _error: &WheelError) {}
}

/// Handed out when a spin starts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpinTicket {
    pub id: SpinId,
    pub winner: usize,
    pub target_degrees: f64,
    pub duration_secs: u32,
}

/// Reported when a spin completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpinOutcome {
    pub id: SpinId,
    pub index: usize,
    pub label: String,
    /// Winner's weight after depletion; `None` when the policy does not deplete.
    pub remaining_weight: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpinPhase {
    Idle,
    Spinning { id: SpinId, winner: usize },
}

pub struct SpinController<S: Storage, D: WheelDisplay> {
    config: WheelConfig,
    rotation: RotationState,
    phase: SpinPhase,
    policy: SelectionPolicy,
    extra_turns: u32,
    timer: SpinTimer,
    rng: Box<dyn RandomSource>,
    store: EntryStore<S>,
    display: D,
}

impl<S: Storage, D: WheelDisplay> SpinController<S, D> {
    /// Load the stored config (or the default list) and draw it once.
    pub fn new(store: EntryStore<S>, display: D) -> Self {
        let config = store.load_or_default();
        let mut c = Self {
            config,
            rotation: RotationState::default(),
            phase: SpinPhase::Idle,
            policy: SelectionPolicy::default(),
            extra_turns: DEFAULT_EXTRA_TURNS,
            timer: SpinTimer::new(),
            rng: Box::new(ThreadRandom),
            store,
            display,
        };
        c.display.redraw(&c.config.entries);
        c
    }

    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_rng(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn with_extra_turns(mut self, extra_turns: u32) -> Self {
        self.extra_turns = clamp_extra_turns(extra_turns);
        self
    }

    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    pub fn entries(&self) -> &[Entry] {
        &self.config.entries
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.phase, SpinPhase::Spinning { .. })
    }

    pub fn spin_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.config.spin_duration_secs))
    }

    /// When the in-flight spin is due to finish.
    pub fn deadline(&self) -> Option<Duration> {
        match self.phase {
            SpinPhase::Spinning { id, .. } => self.timer.deadline(id),
            SpinPhase::Idle => None,
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Start a spin at time `now`.
    pub fn request_spin(&mut self, now: Duration) -> Result<SpinTicket, WheelError> {
        if let SpinPhase::Spinning { id, .. } = self.phase {
            tracing::debug!(%id, "spin requested while spinning, ignored");
            return Err(WheelError::ConcurrentSpinRejected);
        }
        if self.config.entries.len() < MIN_ENTRIES {
            return Err(self.reject(WheelError::InvalidConfiguration(format!(
                "at least {} items are required to spin",
                MIN_ENTRIES
            ))));
        }
        let winner = match self.policy.select(&self.config.entries, self.rng.as_mut()) {
            Ok(i) => i,
            Err(e) => return Err(self.reject(e)),
        };
        let count = self.config.entries.len();
        let target_degrees = self.rotation.advance(winner, count, self.extra_turns);
        let duration = self.spin_duration();
        let id = self.timer.schedule(now, duration);
        self.phase = SpinPhase::Spinning { id, winner };
        tracing::debug!(%id, winner, target_degrees, "spin started");
        self.display.animate_rotation(target_degrees, duration);
        Ok(SpinTicket { id, winner, target_degrees, duration_secs: self.config.spin_duration_secs })
    }

    /// Finish the in-flight spin if its timer has run out by `now`.
    pub fn poll(&mut self, now: Duration) -> Option<SpinOutcome> {
        let mut outcome = None;
        for id in self.timer.take_due(now) {
            match self.phase {
                SpinPhase::Spinning { id: current, winner } if current == id => {
                    outcome = Some(self.finish(id, winner));
                }
                _ => tracing::debug!(%id, "stale spin timer dropped"),
            }
        }
        outcome
    }

    /// Finish the in-flight spin now, for front ends whose animation reports its own end.
    pub fn complete(&mut self, id: SpinId) -> Result<SpinOutcome, WheelError> {
        match self.phase {
            SpinPhase::Spinning { id: current, winner } if current == id => {
                self.timer.cancel(id);
                Ok(self.finish(id, winner))
            }
            _ => Err(WheelError::UnknownSpin(id)),
        }
    }

    fn finish(&mut self, id: SpinId, winner: usize) -> SpinOutcome {
        self.phase = SpinPhase::Idle;
        let label = self.config.entries.get(winner).map(|e| e.label.clone()).unwrap_or_default();
        self.display.show_result(&label);
        let remaining_weight = if self.policy.depletes() {
            let left = apply_depletion(&mut self.config.entries, winner);
            self.persist();
            left
        } else {
            None
        };
        self.display.redraw(&self.config.entries);
        tracing::debug!(%id, winner, label = %label, ?remaining_weight, "spin finished");
        SpinOutcome { id, index: winner, label, remaining_weight }
    }

    /// Replace the whole configuration. The previous one stays active on rejection.
    pub fn save_settings(&mut self, config: WheelConfig) -> Result<(), WheelError> {
        if self.is_spinning() {
            return Err(WheelError::ConcurrentSpinRejected);
        }
        if let Err(e) = config.validate() {
            return Err(self.reject(e));
        }
        tracing::info!(entries = config.entries.len(), duration = config.spin_duration_secs, "wheel settings replaced");
        self.config = config;
        self.rotation.reset();
        self.persist();
        self.display.redraw(&self.config.entries);
        Ok(())
    }

    /// Parse the settings editor text and save it.
    pub fn apply_settings_text(&mut self, text: &str, spin_duration_secs: u32) -> Result<(), WheelError> {
        self.save_settings(WheelConfig::new(parse_entries(text), spin_duration_secs))
    }

    /// Restock one entry.
    pub fn replenish(&mut self, index: usize, weight: u32) -> Result<(), WheelError> {
        if index >= self.config.entries.len() {
            return Err(self.reject(WheelError::InvalidConfiguration(format!("no item at position {}", index + 1))));
        }
        self.config.entries[index].weight = weight;
        tracing::info!(index, weight, "entry replenished");
        self.persist();
        self.display.redraw(&self.config.entries);
        Ok(())
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.config) {
            tracing::warn!(error = %e, "failed to persist wheel config");
        }
    }

    fn reject(&mut self, e: WheelError) -> WheelError {
        if e.is_user_visible() {
            tracing::debug!(error = %e, "request rejected");
            self.display.notify(&e);
        }
        e
    }
}
