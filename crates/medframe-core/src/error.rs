//! Error types for encryption context operations.
//!
//! Strongly-typed errors so callers can apply the right recovery policy:
//! waiting for key distribution (`UnknownEpoch`) is not the same as fixing a
//! call-sequencing bug (`NoEpochEnabled`) or dropping a tampered object
//! (`AuthenticationFailure`). None of these may silently degrade into a
//! best-effort fallback.

use medframe_crypto::CryptoError;
use thiserror::Error;

/// Errors from encryption context operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// `protect` was called before any epoch was enabled. Sequencing error
    /// in the caller; protecting under a default epoch is forbidden.
    #[error("no epoch enabled: enable_epoch must be called before protect")]
    NoEpochEnabled,

    /// No secret is stored for the requested epoch. Recoverable once the
    /// group key-management layer delivers the missing secret; retrying the
    /// same call without it will fail again.
    #[error("unknown epoch: no secret stored for epoch {epoch_id}")]
    UnknownEpoch {
        /// Epoch the caller asked for
        epoch_id: u64,
    },

    /// An epoch secret was re-added with different bytes. Epoch secrets are
    /// immutable once distributed; this indicates a key-distribution bug.
    #[error("epoch secret mismatch: epoch {epoch_id} already has a different secret")]
    EpochSecretMismatch {
        /// Epoch whose secret was re-added
        epoch_id: u64,
    },

    /// Ciphertext failed AEAD authentication. Treated as a security event:
    /// the object is dropped, never retried.
    #[error("authentication failed: object rejected")]
    AuthenticationFailure,

    /// A stored key does not match the suite's AEAD key length
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Key length the suite requires
        expected: usize,
        /// Key length that was found
        actual: usize,
    },
}

impl ContextError {
    /// Returns true if this error indicates a possible attack (a failed
    /// integrity check).
    pub fn is_security_event(&self) -> bool {
        matches!(self, Self::AuthenticationFailure)
    }

    /// Returns true if the operation can succeed later without a code
    /// change, once key distribution catches up.
    pub fn is_missing_key(&self) -> bool {
        matches!(self, Self::UnknownEpoch { .. })
    }
}

impl From<CryptoError> for ContextError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::AuthenticationFailure => Self::AuthenticationFailure,
            CryptoError::InvalidKeyLength { expected, actual } => {
                Self::InvalidKeyLength { expected, actual }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_failure_is_security_event() {
        assert!(ContextError::AuthenticationFailure.is_security_event());
        assert!(!ContextError::NoEpochEnabled.is_security_event());
    }

    #[test]
    fn unknown_epoch_is_missing_key() {
        assert!(ContextError::UnknownEpoch { epoch_id: 7 }.is_missing_key());
        assert!(!ContextError::EpochSecretMismatch { epoch_id: 7 }.is_missing_key());
    }

    #[test]
    fn crypto_errors_convert() {
        assert_eq!(
            ContextError::from(CryptoError::AuthenticationFailure),
            ContextError::AuthenticationFailure
        );
        assert_eq!(
            ContextError::from(CryptoError::InvalidKeyLength { expected: 16, actual: 32 }),
            ContextError::InvalidKeyLength { expected: 16, actual: 32 }
        );
    }

    #[test]
    fn error_display() {
        let err = ContextError::UnknownEpoch { epoch_id: 12 };
        assert_eq!(err.to_string(), "unknown epoch: no secret stored for epoch 12");
    }
}
