//! Epoch counter coordination for conference participants.
//!
//! One shared, monotonically increasing counter per group tracks which
//! epoch the group has reached. A participant that wants to advance the
//! group proposes the value it believes the counter should become; the
//! service accepts the proposal only if the stored value is exactly one
//! behind, atomically: two participants racing to the same next value see
//! exactly one success.
//!
//! Callers depend on the [`CounterService`] trait, never on the concrete
//! backend: [`InMemoryCounter`] for single-process use and testing,
//! [`RedisCounter`] for conferences spanning hosts.

mod memory;
mod redis;

use thiserror::Error;

pub use self::redis::{RedisConfig, RedisCounter};
pub use memory::InMemoryCounter;

/// Shared epoch counter value, `0`-initialized per group.
pub type Counter = u64;

/// Errors from counter advancement.
///
/// The two variants demand different recovery policies, which is why they
/// are never conflated: on `OutOfSync` the caller must refetch the
/// authoritative epoch and resynchronize before trying again; `Unavailable`
/// may be retried as-is with backoff.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CounterError {
    /// The stored counter was not at `expected_next - 1`; the caller has
    /// fallen behind (or run ahead of) the group consensus. Nothing was
    /// mutated.
    #[error("out of sync: counter was not at {expected_next} - 1")]
    OutOfSync {
        /// Value the caller proposed
        expected_next: Counter,
    },

    /// The backend could not be reached or the operation could not
    /// complete, for a reason other than a value mismatch.
    #[error("counter backend unavailable: {reason}")]
    Unavailable {
        /// Backend-reported cause
        reason: String,
    },
}

impl CounterError {
    /// Returns true if the caller's view of the epoch is stale and must be
    /// resynchronized before retrying.
    pub fn is_out_of_sync(&self) -> bool {
        matches!(self, Self::OutOfSync { .. })
    }

    /// Returns true if the same call may succeed on retry without any
    /// state change (transient infrastructure fault).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Interface every counter backend satisfies.
///
/// Object-safe so group glue can hold `Arc<dyn CounterService>` selected at
/// construction.
pub trait CounterService: Send + Sync {
    /// Atomically advance the group counter to `expected_next`.
    ///
    /// Succeeds iff the stored counter equals `expected_next - 1` at the
    /// moment of the attempt, in which case it becomes `expected_next`. A
    /// fresh counter is `0`, so the first accepted proposal is `1`.
    ///
    /// # Errors
    ///
    /// - [`CounterError::OutOfSync`] on a value mismatch (no mutation)
    /// - [`CounterError::Unavailable`] on backend faults
    fn advance_epoch(&self, expected_next: Counter) -> Result<(), CounterError>;

    /// Whether the backend is currently reachable.
    ///
    /// Advisory only: never mutates state, and a `true` result does not
    /// guarantee the next [`advance_epoch`](Self::advance_epoch) succeeds.
    fn is_connected(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_sync_requires_resync() {
        let err = CounterError::OutOfSync { expected_next: 4 };
        assert!(err.is_out_of_sync());
        assert!(!err.is_transient());
    }

    #[test]
    fn unavailable_is_transient() {
        let err = CounterError::Unavailable { reason: "connection refused".to_string() };
        assert!(err.is_transient());
        assert!(!err.is_out_of_sync());
    }

    #[test]
    fn error_display() {
        let err = CounterError::OutOfSync { expected_next: 2 };
        assert_eq!(err.to_string(), "out of sync: counter was not at 2 - 1");
    }
}
