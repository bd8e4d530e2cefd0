pub mod angle;
pub mod entry;
pub mod rng;
pub mod selector;
pub mod spin;
pub mod store;
pub mod timer;
#[cfg(feature = "cli")]
pub mod ui;
#[cfg(feature = "wasm")]
pub mod wasm_api;

pub use entry::{Entry, WheelConfig};
pub use selector::SelectionPolicy;
pub use spin::{SpinController, SpinOutcome, SpinTicket, WheelDisplay};

use timer::SpinId;

#[derive(Debug, thiserror::Error)]
pub enum WheelError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("no eligible entries left on the wheel")]
    Depleted,
    #[error("a spin is already in progress")]
    ConcurrentSpinRejected,
    #[error("{0} is not the spin in progress")]
    UnknownSpin(SpinId),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl WheelError {
    /// Errors the user should hear about. A rejected concurrent spin is a debounce.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, WheelError::ConcurrentSpinRejected)
    }
}

// Shared helper
/// Take one unit of stock from the winner. Returns the remaining weight, or `None`
/// when `index` is out of range.
pub fn apply_depletion(entries: &mut [Entry], index: usize) -> Option<u32> {
    entries.get_mut(index).map(Entry::deplete)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depletion_basic() {
        let mut e = vec![Entry::new("A", 2), Entry::new("B", 0)];
        assert_eq!(apply_depletion(&mut e, 0), Some(1));
        assert_eq!(apply_depletion(&mut e, 1), Some(0));
        assert_eq!(apply_depletion(&mut e, 5), None);
    }
}
