//! Medframe Core: the trust boundary of a real-time media distribution
//! client.
//!
//! Two tightly coupled subsystems decide which key protects a given media
//! object and how distributed participants agree on the current epoch:
//!
//! - [`context`]: per-stream epoch-keyed encryption contexts. Epoch secrets
//!   arrive from the external group key-management layer; base keys are
//!   derived lazily per (stream, epoch) and used to protect outgoing objects
//!   under the enabled epoch and unprotect incoming objects from any epoch
//!   whose secret is known.
//! - [`counter`]: the shared epoch counter with compare-and-increment
//!   semantics, backed either by a process-local value or by a shared Redis
//!   record reachable by every participant in the conference.
//! - [`group`]: thin ownership glue mapping a group identifier to its
//!   counter service and fanning epoch material out to the encryption
//!   contexts created for the group's streams.
//!
//! All entry points are synchronous and safe to call from multiple
//! publish/subscribe worker threads; shared state sits behind per-operation
//! exclusive locks, and the AEAD itself always runs outside those locks.
//!
//! The core never retries and never falls back: every failure is returned
//! to the caller, because only the caller knows whether retrying is safe
//! for the given error kind.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod context;
pub mod counter;
pub mod error;
pub mod group;

pub use context::{EpochContext, EpochId, StreamId};
pub use medframe_crypto::CipherSuite;
pub use counter::{
    Counter, CounterError, CounterService, InMemoryCounter, RedisConfig, RedisCounter,
};
pub use error::ContextError;
pub use group::{GroupId, MediaGroup};
