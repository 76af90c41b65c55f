//! Authenticated object protection using the negotiated suite's AEAD
//!
//! The object header (epoch, counter) is authenticated as associated data
//! and also determines the nonce, so a given (stream, epoch, counter) triple
//! always seals to a decryptable object and any header alteration is
//! detected at open time.

use aes_gcm::{
    Aes128Gcm,
    aead::{Aead, KeyInit, Payload},
};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};

use crate::{derivation::BaseKey, error::CryptoError, suite::CipherSuite};

/// The authenticated header bound into every protected object.
///
/// The transport is responsible for carrying these two values alongside the
/// ciphertext; a receiver reads them from the object and passes them back to
/// `open`. Serialized big-endian, epoch first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectHeader {
    /// Group epoch the object was protected under
    pub epoch: u64,
    /// Caller-supplied object counter, unique per (stream, epoch)
    pub counter: u64,
}

impl ObjectHeader {
    /// Create a header for the given epoch and counter.
    pub fn new(epoch: u64, counter: u64) -> Self {
        Self { epoch, counter }
    }

    /// Header bytes fed to the AEAD as associated data.
    pub fn aad_bytes(&self) -> [u8; 16] {
        let mut aad = [0u8; 16];
        aad[0..8].copy_from_slice(&self.epoch.to_be_bytes());
        aad[8..16].copy_from_slice(&self.counter.to_be_bytes());
        aad
    }

    /// Deterministic nonce for the suite.
    ///
    /// The counter occupies the trailing 8 bytes; the epoch fills as much of
    /// the remaining prefix as the suite's nonce length allows. The key is
    /// already unique per (stream, epoch), so counter uniqueness alone makes
    /// the (key, nonce) pair unique.
    fn nonce_bytes(&self, suite: CipherSuite) -> Vec<u8> {
        let len = suite.nonce_len();
        let prefix = len - 8;
        let mut nonce = vec![0u8; len];

        let epoch_be = self.epoch.to_be_bytes();
        let take = prefix.min(8);
        nonce[prefix - take..prefix].copy_from_slice(&epoch_be[8 - take..]);
        nonce[prefix..].copy_from_slice(&self.counter.to_be_bytes());

        nonce
    }
}

/// Seal a plaintext under the base key, binding the header.
///
/// Output is ciphertext plus the suite's authentication tag.
///
/// # Security
///
/// The caller must never reuse a counter under the same (stream, epoch):
/// the nonce is derived from the header, so counter reuse means nonce reuse.
pub fn seal(
    suite: CipherSuite,
    key: &BaseKey,
    header: &ObjectHeader,
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    check_key_len(suite, key)?;

    let aad = header.aad_bytes();
    let nonce = header.nonce_bytes(suite);
    let payload = Payload { msg: plaintext, aad: &aad };

    let sealed = match suite {
        CipherSuite::Aes128GcmSha256 => {
            let Ok(cipher) = Aes128Gcm::new_from_slice(key.as_bytes()) else {
                unreachable!("key length was checked against the suite");
            };
            cipher.encrypt(aes_gcm::Nonce::from_slice(&nonce), payload)
        },
        CipherSuite::XChaCha20Poly1305Sha256 => {
            let Ok(cipher) = XChaCha20Poly1305::new_from_slice(key.as_bytes()) else {
                unreachable!("key length was checked against the suite");
            };
            cipher.encrypt(XNonce::from_slice(&nonce), payload)
        },
    };

    let Ok(ciphertext) = sealed else {
        unreachable!("AEAD encryption cannot fail with valid key and nonce");
    };

    Ok(ciphertext)
}

/// Open a sealed object, verifying the header binding.
///
/// # Errors
///
/// - `AuthenticationFailure`: tag mismatch from tampered ciphertext, altered
///   header, or a key derived from the wrong secret
/// - `InvalidKeyLength`: key does not match the suite
pub fn open(
    suite: CipherSuite,
    key: &BaseKey,
    header: &ObjectHeader,
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    check_key_len(suite, key)?;

    let aad = header.aad_bytes();
    let nonce = header.nonce_bytes(suite);
    let payload = Payload { msg: ciphertext, aad: &aad };

    let opened = match suite {
        CipherSuite::Aes128GcmSha256 => {
            let Ok(cipher) = Aes128Gcm::new_from_slice(key.as_bytes()) else {
                unreachable!("key length was checked against the suite");
            };
            cipher.decrypt(aes_gcm::Nonce::from_slice(&nonce), payload)
        },
        CipherSuite::XChaCha20Poly1305Sha256 => {
            let Ok(cipher) = XChaCha20Poly1305::new_from_slice(key.as_bytes()) else {
                unreachable!("key length was checked against the suite");
            };
            cipher.decrypt(XNonce::from_slice(&nonce), payload)
        },
    };

    opened.map_err(|_| CryptoError::AuthenticationFailure)
}

fn check_key_len(suite: CipherSuite, key: &BaseKey) -> Result<(), CryptoError> {
    if key.len() != suite.key_len() {
        return Err(CryptoError::InvalidKeyLength {
            expected: suite.key_len(),
            actual: key.len(),
        });
    }
    Ok(())
}
