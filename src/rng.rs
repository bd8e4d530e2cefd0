use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng}; // SeedableRng for from_entropy / seed_from_u64
use std::cell::RefCell;
use std::collections::VecDeque;

thread_local! {
    static TL_RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_entropy());
}

/// Execute closure with a fast thread-local SmallRng.
pub fn with_rng<F, T>(f: F) -> T
where
    F: FnOnce(&mut SmallRng) -> T,
{
    TL_RNG.with(|r| f(&mut r.borrow_mut()))
}

/// Reseed the thread-local RNG for deterministic testing.
/// Safe to call multiple times; affects subsequent calls to `with_rng` in the current thread.
pub fn reseed(seed: u64) {
    TL_RNG.with(|r| *r.borrow_mut() = SmallRng::seed_from_u64(seed));
}

/// Source of uniform draws in `[0, 1)` used by the selectors.
pub trait RandomSource {
    fn uniform(&mut self) -> f64;
}

/// Draws from the thread-local RNG, so `reseed` controls it.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn uniform(&mut self) -> f64 {
        with_rng(|r| r.r#gen::<f64>())
    }
}

/// An owned, seeded generator for callers that want their own stream.
#[derive(Debug, Clone)]
pub struct SeededRandom(SmallRng);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }
}

/// Replays a fixed list of draws, then repeats the last one.
///
/// Values are clamped into `[0, 1)`. An empty script always yields 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    draws: VecDeque<f64>,
    last: f64,
}

impl ScriptedRandom {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self { draws: draws.into_iter().collect(), last: 0.0 }
    }
}

impl RandomSource for ScriptedRandom {
    fn uniform(&mut self) -> f64 {
        if let Some(next) = self.draws.pop_front() {
            self.last = next.clamp(0.0, 1.0 - f64::EPSILON);
        }
        self.last
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn uniform(&mut self) -> f64 {
        (**self).uniform()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reseed_repeats_thread_stream() {
        reseed(11);
        let a: Vec<f64> = (0..4).map(|_| ThreadRandom.uniform()).collect();
        reseed(11);
        let b: Vec<f64> = (0..4).map(|_| ThreadRandom.uniform()).collect();
        assert_eq!(a, b);
        assert!(a.iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn scripted_repeats_last_draw() {
        let mut r = ScriptedRandom::new([0.25, 2.0]);
        assert_eq!(r.uniform(), 0.25);
        assert!(r.uniform() < 1.0);
        assert_eq!(r.uniform(), 1.0 - f64::EPSILON);
    }
}
