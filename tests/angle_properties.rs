use lucky_wheel::angle::{index_under_pointer, stop_angle, target_angle};
use proptest::prelude::*;

fn close_mod_360(a: f64, b: f64) -> bool {
    let d = (a - b).rem_euclid(360.0);
    d < 1e-6 || 360.0 - d < 1e-6
}

proptest! {
    #[test]
    fn target_lands_slice_centre_under_pointer(n in 2usize..64, i_seed in 0usize..1000, prior in 0.0f64..1.0e6, turns in 0u32..12) {
        let i = i_seed % n;
        let t = target_angle(i, n, prior, turns);
        let expected = (270.0 - (i as f64 * 360.0 / n as f64 + 180.0 / n as f64) + 360.0).rem_euclid(360.0);
        prop_assert!(close_mod_360(t, expected));
        prop_assert!(close_mod_360(t, stop_angle(i, n)));
        prop_assert_eq!(index_under_pointer(t, n), i);
    }

    #[test]
    fn successive_targets_gain_at_least_one_turn(n in 2usize..32, picks in prop::collection::vec(0usize..1000, 1..20)) {
        let mut prior = 0.0;
        for p in picks {
            let next = target_angle(p % n, n, prior, 5);
            prop_assert!(next - prior >= 360.0, "{} -> {}", prior, next);
            prior = next;
        }
    }
}
