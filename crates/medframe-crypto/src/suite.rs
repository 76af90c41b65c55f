//! Cipher suites for media object protection

/// Negotiated AEAD and hash pairing for a stream context.
///
/// The suite is fixed when an encryption context is created and never changes
/// for the lifetime of the context. Both ends of a stream must agree on the
/// suite out of band (it is part of the group's negotiated configuration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherSuite {
    /// AES-128-GCM with HKDF-SHA256 key derivation
    Aes128GcmSha256,
    /// XChaCha20-Poly1305 with HKDF-SHA256 key derivation
    XChaCha20Poly1305Sha256,
}

impl CipherSuite {
    /// AEAD key length in bytes.
    pub fn key_len(self) -> usize {
        match self {
            Self::Aes128GcmSha256 => 16,
            Self::XChaCha20Poly1305Sha256 => 32,
        }
    }

    /// AEAD nonce length in bytes.
    pub fn nonce_len(self) -> usize {
        match self {
            Self::Aes128GcmSha256 => 12,
            Self::XChaCha20Poly1305Sha256 => 24,
        }
    }

    /// Authentication tag length in bytes (16 for both suites).
    pub fn tag_len(self) -> usize {
        16
    }
}
