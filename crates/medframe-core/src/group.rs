//! Ownership glue between a conference group, its counter service, and the
//! encryption contexts protecting its streams.
//!
//! A [`MediaGroup`] is constructed by the session layer with whichever
//! counter backend the deployment uses; everything downstream sees only the
//! [`CounterService`] trait. Contexts are handed out as shared handles and
//! tracked weakly, so a context dies with the last publisher or subscriber
//! using it while the group keeps fanning epoch material to the survivors.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use medframe_crypto::CipherSuite;

use crate::{
    context::{EpochContext, EpochId},
    counter::{Counter, CounterError, CounterService},
    error::ContextError,
};

/// Logical conference/group identifier.
pub type GroupId = u64;

/// One conference group: counter handle plus the encryption contexts for
/// its streams.
pub struct MediaGroup {
    group_id: GroupId,
    suite: CipherSuite,
    counter: Arc<dyn CounterService>,
    contexts: Mutex<Vec<Weak<EpochContext>>>,
}

impl MediaGroup {
    /// Create a group bound to a counter backend chosen at construction.
    pub fn new(group_id: GroupId, suite: CipherSuite, counter: Arc<dyn CounterService>) -> Self {
        Self { group_id, suite, counter, contexts: Mutex::new(Vec::new()) }
    }

    /// This group's identifier.
    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    /// Cipher suite every context in this group uses.
    pub fn suite(&self) -> CipherSuite {
        self.suite
    }

    /// Create an encryption context for this group.
    ///
    /// The group keeps a weak reference so later epoch material reaches the
    /// context; the caller owns its lifetime.
    pub fn make_context(&self) -> Arc<EpochContext> {
        let context = Arc::new(EpochContext::new(self.suite));
        self.lock_contexts().push(Arc::downgrade(&context));
        context
    }

    /// Fan an epoch secret out to every live context.
    ///
    /// # Errors
    ///
    /// Propagates the first [`ContextError::EpochSecretMismatch`]; contexts
    /// visited before the failure keep the secret (they hold the original
    /// bytes either way, since a mismatch never overwrites).
    pub fn add_epoch_secret(&self, epoch_id: EpochId, secret: &[u8]) -> Result<(), ContextError> {
        let mut contexts = self.lock_contexts();
        contexts.retain(|context| context.strong_count() > 0);

        for context in contexts.iter().filter_map(Weak::upgrade) {
            context.add_epoch_secret(epoch_id, secret)?;
        }
        Ok(())
    }

    /// Enable an epoch on every live context.
    pub fn enable_epoch(&self, epoch_id: EpochId) {
        let mut contexts = self.lock_contexts();
        contexts.retain(|context| context.strong_count() > 0);

        for context in contexts.iter().filter_map(Weak::upgrade) {
            context.enable_epoch(epoch_id);
        }
    }

    /// Propose the next epoch value to the group's counter service.
    ///
    /// # Errors
    ///
    /// See [`CounterService::advance_epoch`].
    pub fn advance_epoch(&self, expected_next: Counter) -> Result<(), CounterError> {
        self.counter.advance_epoch(expected_next)
    }

    /// Whether the group's counter backend is reachable.
    pub fn is_connected(&self) -> bool {
        self.counter.is_connected()
    }

    fn lock_contexts(&self) -> MutexGuard<'_, Vec<Weak<EpochContext>>> {
        self.contexts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
