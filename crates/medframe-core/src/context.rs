//! Epoch-keyed encryption contexts for addressable media streams.
//!
//! An [`EpochContext`] owns the epoch-secret table and the per-stream key
//! tables for one client session. Secrets are supplied by the external group
//! key-management layer via [`EpochContext::add_epoch_secret`]; base keys
//! are derived lazily the first time a (stream, epoch) pair is used, and
//! accumulate until the context is dropped.
//!
//! # Locking
//!
//! One exclusive lock guards all mutable state, held per-operation and only
//! long enough to fetch or derive a key. The AEAD runs after the lock is
//! released; it touches no shared state. Cross-thread visibility of a newly
//! enabled epoch follows from the lock's happens-before edge.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use medframe_crypto::{BaseKey, CipherSuite, ObjectHeader, derive_base_key, open, seal};
use zeroize::Zeroizing;

use crate::error::ContextError;

/// Monotonically increasing epoch identifier within a group.
pub type EpochId = u64;

/// Opaque identifier of one addressable content stream within a group.
///
/// The raw bytes also salt base-key derivation, so the identifier must be
/// byte-for-byte identical on every participant addressing the stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamId(Vec<u8>);

impl StreamId {
    /// Create a stream identifier from raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Raw identifier bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for StreamId {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

impl From<&[u8]> for StreamId {
    fn from(value: &[u8]) -> Self {
        Self(value.to_vec())
    }
}

/// Per-session encryption context keyed by group epoch.
///
/// Thread-safe: all operations take `&self` and may be called concurrently
/// from independent publish/subscribe workers.
pub struct EpochContext {
    suite: CipherSuite,
    state: Mutex<ContextState>,
}

#[derive(Default)]
struct ContextState {
    /// Epoch new outgoing objects are protected under; unset until the
    /// caller enables one. Protect fails rather than defaulting to epoch 0.
    current_epoch: Option<EpochId>,
    /// Secrets from the group key-management layer, wiped on drop
    epoch_secrets: HashMap<EpochId, Zeroizing<Vec<u8>>>,
    /// Lazily derived base keys, per stream then per epoch
    stream_keys: HashMap<StreamId, HashMap<EpochId, BaseKey>>,
}

impl EpochContext {
    /// Create a context for the negotiated suite. The suite is immutable
    /// for the lifetime of the context.
    pub fn new(suite: CipherSuite) -> Self {
        Self { suite, state: Mutex::new(ContextState::default()) }
    }

    /// The context's negotiated cipher suite.
    pub fn suite(&self) -> CipherSuite {
        self.suite
    }

    /// Store the secret for an epoch, for later key derivation.
    ///
    /// Re-adding the identical secret is an accepted no-op, so retried key
    /// distribution stays idempotent. Re-adding a *different* secret for a
    /// known epoch is rejected: epoch secrets never change identity.
    pub fn add_epoch_secret(&self, epoch_id: EpochId, secret: &[u8]) -> Result<(), ContextError> {
        let mut state = self.lock();

        if let Some(existing) = state.epoch_secrets.get(&epoch_id) {
            if existing.as_slice() == secret {
                return Ok(());
            }
            return Err(ContextError::EpochSecretMismatch { epoch_id });
        }

        state.epoch_secrets.insert(epoch_id, Zeroizing::new(secret.to_vec()));
        tracing::debug!(epoch_id, "stored epoch secret");
        Ok(())
    }

    /// Select the epoch new outgoing objects are protected under.
    ///
    /// Derives nothing: key derivation stays lazy, on the first protect or
    /// unprotect touching each stream. Enabling an epoch whose secret has
    /// not arrived yet is allowed; protect reports `UnknownEpoch` until the
    /// secret is added.
    pub fn enable_epoch(&self, epoch_id: EpochId) {
        let mut state = self.lock();
        state.current_epoch = Some(epoch_id);
        tracing::debug!(epoch_id, "enabled epoch");
    }

    /// Epoch currently enabled for outgoing objects, if any.
    pub fn current_epoch(&self) -> Option<EpochId> {
        self.lock().current_epoch
    }

    /// Protect a plaintext for `stream` under the currently enabled epoch.
    ///
    /// The returned ciphertext authenticates the (epoch, counter) header;
    /// the transport must carry both values so the receiver can call
    /// [`unprotect`](Self::unprotect).
    ///
    /// `counter` must be unique per (stream, epoch); that discipline
    /// belongs to the caller, and reuse is a confidentiality violation for
    /// the underlying AEAD.
    ///
    /// # Errors
    ///
    /// - `NoEpochEnabled` if no epoch has been enabled
    /// - `UnknownEpoch` if the enabled epoch's secret is missing
    pub fn protect(
        &self,
        stream: &StreamId,
        counter: u64,
        plaintext: &[u8],
    ) -> Result<Vec<u8>, ContextError> {
        let (epoch_id, key) = {
            let mut state = self.lock();
            let epoch_id = state.current_epoch.ok_or(ContextError::NoEpochEnabled)?;
            let key = Self::fetch_or_derive(self.suite, &mut state, epoch_id, stream)?;
            (epoch_id, key)
        };

        let header = ObjectHeader::new(epoch_id, counter);
        Ok(seal(self.suite, &key, &header, plaintext)?)
    }

    /// Unprotect a ciphertext received for `stream`.
    ///
    /// The caller supplies the epoch read from the object's own header; it
    /// may be older than the currently enabled epoch, and any epoch whose
    /// secret is known decrypts.
    ///
    /// # Errors
    ///
    /// - `UnknownEpoch` if no secret is stored for `epoch_id`
    /// - `AuthenticationFailure` if the ciphertext or header was altered
    pub fn unprotect(
        &self,
        epoch_id: EpochId,
        stream: &StreamId,
        counter: u64,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, ContextError> {
        let key = {
            let mut state = self.lock();
            Self::fetch_or_derive(self.suite, &mut state, epoch_id, stream)?
        };

        let header = ObjectHeader::new(epoch_id, counter);
        Ok(open(self.suite, &key, &header, ciphertext)?)
    }

    /// Fetch the cached base key for (stream, epoch), deriving and caching
    /// it on first use. Never derives for an epoch whose secret is unknown.
    ///
    /// Caller holds the state lock.
    fn fetch_or_derive(
        suite: CipherSuite,
        state: &mut ContextState,
        epoch_id: EpochId,
        stream: &StreamId,
    ) -> Result<BaseKey, ContextError> {
        if let Some(key) = state.stream_keys.get(stream).and_then(|keys| keys.get(&epoch_id)) {
            return Ok(key.clone());
        }

        let secret = state
            .epoch_secrets
            .get(&epoch_id)
            .ok_or(ContextError::UnknownEpoch { epoch_id })?;
        let key = derive_base_key(suite, secret, stream.as_bytes());

        state.stream_keys.entry(stream.clone()).or_default().insert(epoch_id, key.clone());
        tracing::debug!(epoch_id, "derived base key for stream");
        Ok(key)
    }

    fn lock(&self) -> MutexGuard<'_, ContextState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
