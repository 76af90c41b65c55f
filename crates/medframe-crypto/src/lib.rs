//! Medframe Cryptographic Primitives
//!
//! Cipher suite binding for epoch-keyed media protection. Pure functions with
//! deterministic outputs: every participant holding the same epoch secret
//! derives the same keys and can decrypt the same objects.
//!
//! # Key Lifecycle
//!
//! For each group epoch, a base key is derived per content stream from the
//! epoch secret. The derivation is salted with the stream identifier, so two
//! streams protected under the same epoch secret never share a key.
//!
//! ```text
//! Group Epoch Secret
//!        │
//!        ▼
//! HKDF → Base Key (per epoch, per stream)
//!        │
//!        ▼
//! AEAD Seal/Open → Protected Object
//! ```
//!
//! The AEAD binds the object header (epoch, counter) as associated data, so
//! a receiver that trusts the header can locate the matching key and reject
//! any object whose header was altered in transit.
//!
//! # Security
//!
//! - Determinism: same (suite, epoch secret, stream) always yields the same
//!   base key. This is what makes independently-running participants
//!   interoperable.
//! - Stream isolation: the stream identifier salts the derivation, so a
//!   compromised per-stream key does not expose sibling streams.
//! - Counter uniqueness is a hard caller precondition: the nonce is built
//!   from (epoch, counter), and reusing a counter under the same
//!   (stream, epoch) key violates AEAD confidentiality.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod derivation;
pub mod error;
pub mod seal;
pub mod suite;

pub use derivation::{BaseKey, derive_base_key};
pub use error::CryptoError;
pub use seal::{ObjectHeader, open, seal};
pub use suite::CipherSuite;
