//! [`KeyMaterial`]: the AES key and IV derived from the configured encoding key.

use base64::Engine as _;
use common::CryptoError;
use thiserror::Error;

use super::LENIENT_BASE64;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of the CBC initialisation vector.
pub const IV_LEN: usize = 16;

/// Character length of the configured encoding key (base64 without its `=`).
pub const ENCODED_KEY_LEN: usize = 43;

/// Errors produced while deriving key material.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The encoding key is not valid base64.
    #[error("encoding key is not valid base64: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    /// The encoding key decoded to the wrong number of bytes.
    #[error("encoding key must decode to {KEY_LEN} bytes, got {0}")]
    InvalidLength(usize),
}

impl From<KeyError> for CryptoError {
    fn from(e: KeyError) -> Self {
        CryptoError::Configuration(e.to_string())
    }
}

/// The raw AES-256 key and its IV (the first [`IV_LEN`] bytes of the key).
///
/// Derived once when a credential set is loaded and immutable afterwards, so
/// it can be shared across threads without synchronisation. The key bytes are
/// overwritten with zeroes on drop.
#[derive(Clone)]
pub struct KeyMaterial {
    key: [u8; KEY_LEN],
}

impl KeyMaterial {
    /// Derive key material from the 43-character base64 encoding key.
    ///
    /// A single `=` is appended before decoding; the result must be exactly
    /// [`KEY_LEN`] bytes.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidEncoding`] if the key is not base64, or
    /// [`KeyError::InvalidLength`] if it does not decode to 32 bytes.
    pub fn from_encoding_key(encoding_key: &str) -> Result<Self, KeyError> {
        let decoded = LENIENT_BASE64.decode(format!("{encoding_key}="))?;
        if decoded.len() != KEY_LEN {
            return Err(KeyError::InvalidLength(decoded.len()));
        }
        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(&decoded);
        Ok(Self { key })
    }

    /// The 32-byte AES key.
    pub fn key(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    /// The 16-byte IV.
    pub fn iv(&self) -> &[u8] {
        &self.key[..IV_LEN]
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        self.key.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("KeyMaterial([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENCODING_KEY: &str = "djd2WiYRvgqbCUwzeFojrmAP6uhoA8qZXDrwYQJ6fUM";

    #[test]
    fn derives_key_and_iv() {
        let km = KeyMaterial::from_encoding_key(ENCODING_KEY).unwrap();
        assert_eq!(ENCODING_KEY.len(), ENCODED_KEY_LEN);
        assert_eq!(km.key().len(), KEY_LEN);
        assert_eq!(km.iv(), &km.key()[..IV_LEN]);
        // "djd2" decodes to 0x76 0x37 0x76.
        assert_eq!(&km.key()[..3], &[0x76, 0x37, 0x76]);
    }

    #[test]
    fn rejects_short_key() {
        let err = KeyMaterial::from_encoding_key("c2hvcnQ").unwrap_err();
        assert!(matches!(err, KeyError::InvalidLength(_)));
    }

    #[test]
    fn rejects_non_base64() {
        let bad = "!".repeat(ENCODED_KEY_LEN);
        let err = KeyMaterial::from_encoding_key(&bad).unwrap_err();
        assert!(matches!(err, KeyError::InvalidEncoding(_)));
    }

    #[test]
    fn key_error_is_configuration_error() {
        let err: CryptoError = KeyError::InvalidLength(5).into();
        assert!(matches!(err, CryptoError::Configuration(_)));
    }

    #[test]
    fn key_material_redacted_in_debug() {
        let km = KeyMaterial::from_encoding_key(ENCODING_KEY).unwrap();
        assert_eq!(format!("{km:?}"), "KeyMaterial([REDACTED])");
    }
}
