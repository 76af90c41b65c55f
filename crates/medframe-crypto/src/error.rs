//! Error types for cryptographic operations

use thiserror::Error;

/// Errors from seal/open operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Ciphertext failed AEAD authentication (tampering, corruption, or a
    /// wrong key). Distinguishable from missing-key conditions, which are
    /// reported by the layer that owns the key tables.
    #[error("authentication failed: object rejected")]
    AuthenticationFailure,

    /// Key material has the wrong length for the suite's AEAD
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Key length the suite requires
        expected: usize,
        /// Key length that was supplied
        actual: usize,
    },
}

impl CryptoError {
    /// Returns true if this error indicates a possible attack (a failed
    /// integrity check). Such objects are dropped, never retried.
    pub fn is_security_event(&self) -> bool {
        matches!(self, Self::AuthenticationFailure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_failure_is_security_event() {
        assert!(CryptoError::AuthenticationFailure.is_security_event());
    }

    #[test]
    fn key_length_is_not_security_event() {
        let err = CryptoError::InvalidKeyLength { expected: 16, actual: 32 };
        assert!(!err.is_security_event());
    }

    #[test]
    fn error_display() {
        let err = CryptoError::InvalidKeyLength { expected: 16, actual: 3 };
        assert_eq!(err.to_string(), "invalid key length: expected 16, got 3");
    }
}
