use lucky_wheel::{
    Entry,
    rng::{RandomSource, SeededRandom, ThreadRandom, reseed},
    selector::{select, select_uniform},
};

fn wheel(weights: &[u32]) -> Vec<Entry> {
    weights.iter().enumerate().map(|(i, w)| Entry::new(format!("item{}", i), *w)).collect()
}

#[test]
fn selection_sequence_repeats_with_same_seed() {
    let entries = wheel(&[1, 3, 0, 6]);
    reseed(42);
    let first: Vec<usize> = (0..50).map(|_| select(&entries, &mut ThreadRandom).unwrap()).collect();
    reseed(42);
    let second: Vec<usize> = (0..50).map(|_| select(&entries, &mut ThreadRandom).unwrap()).collect();
    assert_eq!(first, second, "Selection sequence should match with same seed");
    assert!(!first.contains(&2), "Zero-weight entry must never win");
}

#[test]
fn weighted_frequencies_converge() {
    let entries = wheel(&[1, 2, 7]);
    let mut rng = SeededRandom::new(7);
    let trials = 100_000;
    let mut hits = [0u32; 3];
    for _ in 0..trials {
        hits[select(&entries, &mut rng).unwrap()] += 1;
    }
    for (i, expected) in [0.1, 0.2, 0.7].iter().enumerate() {
        let observed = f64::from(hits[i]) / f64::from(trials);
        assert!((observed - expected).abs() < 0.01, "index {} observed {:.4}, expected {}", i, observed, expected);
    }
}

#[test]
fn uniform_frequencies_ignore_weight() {
    let entries = wheel(&[1, 50, 0, 9]);
    let mut rng = SeededRandom::new(99);
    let trials = 80_000;
    let mut hits = [0u32; 4];
    for _ in 0..trials {
        hits[select_uniform(&entries, &mut rng).unwrap()] += 1;
    }
    for h in hits {
        let observed = f64::from(h) / f64::from(trials);
        assert!((observed - 0.25).abs() < 0.01, "observed {:.4}", observed);
    }
}

#[test]
fn seeded_sources_stay_in_unit_interval() {
    let mut rng = SeededRandom::new(3);
    assert!((0..1000).map(|_| rng.uniform()).all(|v| (0.0..1.0).contains(&v)));
}
