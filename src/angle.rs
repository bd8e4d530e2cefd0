//! Wheel geometry.
//!
//! The wheel is drawn with its 0° at 3 o'clock, segments laid out clockwise. The
//! pointer sits at 12 o'clock, which is 270° in the wheel's own frame. Rotations are
//! clockwise and accumulate across spins so the animation only ever moves forward.

pub const FULL_TURN: f64 = 360.0;
pub const POINTER_DEGREES: f64 = 270.0;
pub const MIN_EXTRA_TURNS: u32 = 5;
pub const MAX_EXTRA_TURNS: u32 = 8;
pub const DEFAULT_EXTRA_TURNS: u32 = MIN_EXTRA_TURNS;

pub fn slice_degrees(entry_count: usize) -> f64 {
    FULL_TURN / entry_count as f64
}

pub fn slice_center_degrees(index: usize, entry_count: usize) -> f64 {
    let slice = slice_degrees(entry_count);
    index as f64 * slice + slice / 2.0
}

/// Minimal forward rotation, within one turn, that brings the centre of `index` under
/// the pointer.
pub fn stop_angle(index: usize, entry_count: usize) -> f64 {
    (POINTER_DEGREES - slice_center_degrees(index, entry_count) + FULL_TURN).rem_euclid(FULL_TURN)
}

pub fn clamp_extra_turns(extra_turns: u32) -> u32 {
    extra_turns.clamp(MIN_EXTRA_TURNS, MAX_EXTRA_TURNS)
}

/// New cumulative rotation for a spin landing on `index`.
///
/// Snaps `prior` down to its last whole turn, then adds the extra turns, the stop
/// angle and one more turn. The result is at least one turn past `prior` and lands
/// on `stop_angle(index, entry_count)` modulo 360.
pub fn target_angle(index: usize, entry_count: usize, prior_cumulative: f64, extra_turns: u32) -> f64 {
    let base = prior_cumulative - prior_cumulative.rem_euclid(FULL_TURN);
    let delta = f64::from(clamp_extra_turns(extra_turns)) * FULL_TURN + stop_angle(index, entry_count);
    base + delta + FULL_TURN
}

/// Which segment sits under the pointer after rotating the wheel by `rotation` degrees.
pub fn index_under_pointer(rotation: f64, entry_count: usize) -> usize {
    if entry_count == 0 {
        return 0;
    }
    let value = (POINTER_DEGREES - rotation.rem_euclid(FULL_TURN) + FULL_TURN).rem_euclid(FULL_TURN);
    let idx = (value / slice_degrees(entry_count)).floor() as usize;
    idx.min(entry_count - 1)
}

/// Cumulative rotation tracked across spins.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct RotationState {
    pub cumulative_degrees: f64,
}

impl RotationState {
    /// Advance to the target for `index` and return it.
    pub fn advance(&mut self, index: usize, entry_count: usize, extra_turns: u32) -> f64 {
        self.cumulative_degrees = target_angle(index, entry_count, self.cumulative_degrees, extra_turns);
        self.cumulative_degrees
    }

    pub fn reset(&mut self) {
        self.cumulative_degrees = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_angle_for_two_slices() {
        // A spans 0..180 (centre 90), B spans 180..360 (centre 270).
        assert_eq!(stop_angle(0, 2), 180.0);
        assert_eq!(stop_angle(1, 2), 0.0);
    }

    #[test]
    fn first_spin_from_rest() {
        let t = target_angle(0, 4, 0.0, 5);
        // centre 45, stop 225, 5 turns + one extra.
        assert_eq!(t, 6.0 * 360.0 + 225.0);
    }

    #[test]
    fn extra_turns_clamped() {
        assert_eq!(target_angle(1, 2, 0.0, 0), target_angle(1, 2, 0.0, MIN_EXTRA_TURNS));
        assert_eq!(target_angle(1, 2, 0.0, 99), target_angle(1, 2, 0.0, MAX_EXTRA_TURNS));
    }

    #[test]
    fn pointer_reads_back_winner() {
        for n in 2..=12 {
            for i in 0..n {
                let t = target_angle(i, n, 1234.5, 6);
                assert_eq!(index_under_pointer(t, n), i, "n={} i={}", n, i);
            }
        }
    }
}
