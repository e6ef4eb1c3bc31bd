use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE_MS: u64 = 750;

/// Quiescence period before a filter change is applied.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(DEFAULT_DEBOUNCE_MS);

/// Single-slot debouncer.
///
/// Each [`submit`](Debouncer::submit) replaces the pending value and restarts
/// the wait. [`poll`](Debouncer::poll) hands the value out once `delay` has
/// passed without another submit. Superseded values are dropped, never queued.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Replace any pending value and restart the wait from `now`.
    pub fn submit(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Take the pending value if it has been quiet for `delay`.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let (_, submitted) = self.pending.as_ref()?;
        if now.saturating_duration_since(*submitted) < self.delay {
            return None;
        }
        self.pending.take().map(|(value, _)| value)
    }

    /// Time left until the pending value is due; `None` when idle.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        let (_, submitted) = self.pending.as_ref()?;
        Some(self.delay.saturating_sub(now.saturating_duration_since(*submitted)))
    }

    /// Drop the pending value without applying it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_nothing_before_delay() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(750 * MS);
        d.submit(1, t0);
        assert_eq!(d.poll(t0), None);
        assert_eq!(d.poll(t0 + 749 * MS), None);
        assert!(d.is_pending());
        assert_eq!(d.poll(t0 + 750 * MS), Some(1));
        assert!(!d.is_pending());
        assert_eq!(d.poll(t0 + 2000 * MS), None);
    }

    #[test]
    fn test_resubmit_restarts_wait_and_keeps_latest() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(750 * MS);
        d.submit("a", t0);
        d.submit("b", t0 + 500 * MS);
        // 750ms after the first submit but only 250ms after the second.
        assert_eq!(d.poll(t0 + 750 * MS), None);
        d.submit("c", t0 + 1000 * MS);
        assert_eq!(d.poll(t0 + 1500 * MS), None);
        assert_eq!(d.poll(t0 + 1750 * MS), Some("c"));
        assert_eq!(d.poll(t0 + 5000 * MS), None);
    }

    #[test]
    fn test_remaining() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(750 * MS);
        assert_eq!(d.remaining(t0), None);
        d.submit((), t0);
        assert_eq!(d.remaining(t0 + 250 * MS), Some(500 * MS));
        assert_eq!(d.remaining(t0 + 900 * MS), Some(Duration::ZERO));
    }

    #[test]
    fn test_cancel() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(DEFAULT_DEBOUNCE);
        d.submit(7, t0);
        d.cancel();
        assert_eq!(d.poll(t0 + DEFAULT_DEBOUNCE), None);
    }
}
