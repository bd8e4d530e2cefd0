use serde::{Deserialize, Serialize};

use crate::WheelError;
use crate::entry::{Entry, total_weight};
use crate::rng::RandomSource;

/// How a winner is drawn and what a win does to the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicy {
    /// Every segment equally likely; weights ignored.
    Uniform,
    /// Probability proportional to weight.
    #[default]
    Weighted,
    /// Weighted, and the winner loses one unit of weight.
    Depleting,
}

impl SelectionPolicy {
    pub fn depletes(self) -> bool {
        matches!(self, SelectionPolicy::Depleting)
    }

    pub fn select(self, entries: &[Entry], rng: &mut dyn RandomSource) -> Result<usize, WheelError> {
        match self {
            SelectionPolicy::Uniform => select_uniform(entries, rng),
            SelectionPolicy::Weighted | SelectionPolicy::Depleting => select(entries, rng),
        }
    }
}

impl std::str::FromStr for SelectionPolicy {
    type Err = WheelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform" => Ok(SelectionPolicy::Uniform),
            "weighted" => Ok(SelectionPolicy::Weighted),
            "depleting" => Ok(SelectionPolicy::Depleting),
            other => Err(WheelError::InvalidConfiguration(format!("unknown selection mode '{}'", other))),
        }
    }
}

/// Cumulative-weight inversion: draw `r` in `[0, total)`, walk the entries subtracting
/// each weight, and the first entry that drives `r` below zero wins.
///
/// Zero-weight entries can never win. `Depleted` when the total weight is zero.
pub fn select(entries: &[Entry], rng: &mut dyn RandomSource) -> Result<usize, WheelError> {
    let total = total_weight(entries);
    if total == 0 {
        return Err(WheelError::Depleted);
    }
    let mut r = rng.uniform() * total as f64;
    for (i, entry) in entries.iter().enumerate() {
        r -= f64::from(entry.weight);
        if r < 0.0 {
            return Ok(i);
        }
    }
    // Only reachable through float rounding; the last eligible entry absorbs it.
    Ok(entries.iter().rposition(Entry::is_eligible).unwrap_or(entries.len() - 1))
}

/// Every entry equally likely regardless of weight. `Depleted` only for an empty list.
pub fn select_uniform(entries: &[Entry], rng: &mut dyn RandomSource) -> Result<usize, WheelError> {
    if entries.is_empty() {
        return Err(WheelError::Depleted);
    }
    let idx = (rng.uniform() * entries.len() as f64).floor() as usize;
    Ok(idx.min(entries.len() - 1))
}
