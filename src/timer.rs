use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

/// Monotonic time since some fixed origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall clock backed by `Instant`. Not available on wasm, where the page passes
/// `performance.now()` in instead.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl SystemClock {
    pub fn new() -> Self {
        Self { origin: std::time::Instant::now() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually advanced clock for tests. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now: Rc<Cell<Duration>>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, at: Duration) {
        self.now.set(at);
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Identity of one spin; ids only grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct SpinId(pub u64);

impl std::fmt::Display for SpinId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "spin#{}", self.0)
    }
}

/// Pending completions keyed by spin id.
#[derive(Debug, Default)]
pub struct SpinTimer {
    next_id: u64,
    pending: BTreeMap<SpinId, Duration>,
}

impl SpinTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a completion `after` from `now`; returns the fresh spin id.
    pub fn schedule(&mut self, now: Duration, after: Duration) -> SpinId {
        self.next_id += 1;
        let id = SpinId(self.next_id);
        self.pending.insert(id, now + after);
        id
    }

    /// Drop a pending task. Returns whether it was still pending.
    pub fn cancel(&mut self, id: SpinId) -> bool {
        self.pending.remove(&id).is_some()
    }

    pub fn deadline(&self, id: SpinId) -> Option<Duration> {
        self.pending.get(&id).copied()
    }

    pub fn is_pending(&self, id: SpinId) -> bool {
        self.pending.contains_key(&id)
    }

    /// Remove and return every task whose deadline is at or before `now`, oldest first.
    pub fn take_due(&mut self, now: Duration) -> Vec<SpinId> {
        let due: Vec<SpinId> = self.pending.iter().filter(|(_, at)| **at <= now).map(|(id, _)| *id).collect();
        for id in &due {
            self.pending.remove(id);
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_only_after_deadline() {
        let clock = VirtualClock::new();
        let mut t = SpinTimer::new();
        let id = t.schedule(clock.now(), Duration::from_secs(3));
        clock.advance(Duration::from_millis(2999));
        assert!(t.take_due(clock.now()).is_empty());
        clock.advance(Duration::from_millis(1));
        assert_eq!(t.take_due(clock.now()), vec![id]);
        assert!(!t.is_pending(id));
    }

    #[test]
    fn cancel_removes_task() {
        let mut t = SpinTimer::new();
        let a = t.schedule(Duration::ZERO, Duration::from_secs(1));
        let b = t.schedule(Duration::ZERO, Duration::from_secs(1));
        assert!(a < b);
        assert!(t.cancel(a));
        assert!(!t.cancel(a));
        assert_eq!(t.take_due(Duration::from_secs(5)), vec![b]);
    }
}
