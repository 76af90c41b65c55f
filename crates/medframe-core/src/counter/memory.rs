//! In-process counter backend.
//!
//! Useful for single-process conferences and local testing. Concurrent
//! callers serialize on an exclusive lock, which gives the same
//! exactly-one-winner guarantee the remote backend gets from atomic
//! compare-and-set.

use std::sync::{Mutex, PoisonError};

use super::{Counter, CounterError, CounterService};

/// Counter backend owned by the local process.
#[derive(Debug, Default)]
pub struct InMemoryCounter {
    epoch: Mutex<Counter>,
}

impl InMemoryCounter {
    /// Create a fresh counter at `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stored value (test and diagnostic aid).
    pub fn current(&self) -> Counter {
        *self.epoch.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CounterService for InMemoryCounter {
    fn advance_epoch(&self, expected_next: Counter) -> Result<(), CounterError> {
        let mut epoch = self.epoch.lock().unwrap_or_else(PoisonError::into_inner);

        if epoch.checked_add(1) != Some(expected_next) {
            return Err(CounterError::OutOfSync { expected_next });
        }

        *epoch = expected_next;
        tracing::debug!(epoch = expected_next, "advanced local epoch counter");
        Ok(())
    }

    // The in-memory backend is local, so it is always "connected"
    fn is_connected(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_counter_accepts_one_first() {
        let counter = InMemoryCounter::new();
        assert_eq!(counter.current(), 0);
        assert!(counter.advance_epoch(1).is_ok());
        assert_eq!(counter.current(), 1);
    }

    #[test]
    fn fresh_counter_rejects_everything_but_one() {
        let counter = InMemoryCounter::new();
        for wrong in [0u64, 2, 3, 100, u64::MAX] {
            assert_eq!(
                counter.advance_epoch(wrong),
                Err(CounterError::OutOfSync { expected_next: wrong })
            );
            assert_eq!(counter.current(), 0, "out-of-sync attempts must not mutate");
        }
    }

    #[test]
    fn repeat_of_succeeded_value_is_out_of_sync() {
        let counter = InMemoryCounter::new();
        assert!(counter.advance_epoch(1).is_ok());
        assert_eq!(counter.advance_epoch(1), Err(CounterError::OutOfSync { expected_next: 1 }));
        assert!(counter.advance_epoch(2).is_ok());
    }

    #[test]
    fn sequential_advancement() {
        let counter = InMemoryCounter::new();
        for next in 1..=10u64 {
            assert!(counter.advance_epoch(next).is_ok());
        }
        assert_eq!(counter.current(), 10);
        // Every stale value is rejected
        for stale in 0..=10u64 {
            assert!(counter.advance_epoch(stale).is_err());
        }
    }

    #[test]
    fn always_connected() {
        assert!(InMemoryCounter::new().is_connected());
    }
}
