//! Base key derivation using HKDF

use std::fmt;

use hkdf::Hkdf;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::suite::CipherSuite;

/// Label prefixed to the stream identifier to form the HKDF salt
const BASE_KEY_SALT_LABEL: &[u8] = b"medframe epoch base key ";

/// Info parameter for the HKDF expand step
const BASE_KEY_INFO: &[u8] = b"medframe base key v1";

/// A derived per-(stream, epoch) base key.
///
/// Sized for the suite it was derived for and zeroized on drop. Cloning is
/// cheap and intentional: `protect`/`unprotect` clone the key out of the
/// shared table so the AEAD can run without holding the table lock.
#[derive(Clone)]
pub struct BaseKey {
    bytes: Vec<u8>,
}

// Key material is compared in constant time; lengths are public (they
// follow from the suite) so the length check may short-circuit
impl PartialEq for BaseKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes.ct_eq(&other.bytes).into()
    }
}

impl Eq for BaseKey {}

impl BaseKey {
    /// Raw key bytes for the AEAD.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Key length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the key is empty (never true for a derived key).
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Drop for BaseKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

// Key material never appears in logs or panic messages
impl fmt::Debug for BaseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BaseKey({} bytes)", self.bytes.len())
    }
}

/// Derive the base key for a (stream, epoch secret) pair.
///
/// The stream identifier salts the extraction, so two streams protected
/// under the same epoch secret never share a key. The suite is bound into
/// the expand info: HKDF-Expand output is prefix-stable, so without the
/// discriminant the shorter suite's key would be a byte prefix of the
/// longer one. The output length matches the suite's AEAD key length.
///
/// # Security
///
/// - Deterministic: same (suite, secret, stream) always produces the same
///   key, on every participant. Required for interoperable decryption.
/// - Different streams produce different keys (stream isolation)
/// - Different suites produce unrelated keys (no shared prefix)
/// - Different epoch secrets produce different keys
pub fn derive_base_key(suite: CipherSuite, epoch_secret: &[u8], stream: &[u8]) -> BaseKey {
    let mut salt = Vec::with_capacity(BASE_KEY_SALT_LABEL.len() + stream.len());
    salt.extend_from_slice(BASE_KEY_SALT_LABEL);
    salt.extend_from_slice(stream);

    let hkdf = Hkdf::<Sha256>::new(Some(&salt), epoch_secret);

    // Build the info parameter: label || suite discriminant
    let label = suite_label(suite);
    let mut info = Vec::with_capacity(BASE_KEY_INFO.len() + 1 + label.len());
    info.extend_from_slice(BASE_KEY_INFO);
    info.push(b' ');
    info.extend_from_slice(label);

    let mut bytes = vec![0u8; suite.key_len()];
    let Ok(()) = hkdf.expand(&info, &mut bytes) else {
        unreachable!("suite key lengths are valid HKDF-SHA256 output lengths");
    };

    BaseKey { bytes }
}

/// Per-suite discriminant mixed into the HKDF info
fn suite_label(suite: CipherSuite) -> &'static [u8] {
    match suite {
        CipherSuite::Aes128GcmSha256 => b"aes128gcm-sha256",
        CipherSuite::XChaCha20Poly1305Sha256 => b"xchacha20poly1305-sha256",
    }
}
