//! The plaintext envelope and its sealed (encrypted, base64) form.
//!
//! ```text
//! random[16] || len(message) as u32 BE || message || account_id
//! ```
//!
//! The random prefix is the 16-character hex text of 8 random bytes; the
//! envelope carries the hex characters, not the raw bytes.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::CryptoError;

use super::{cipher, key::KeyMaterial, padding, LENIENT_BASE64};

/// Length of the random prefix in bytes.
pub const RANDOM_PREFIX_LEN: usize = 16;

const LENGTH_PREFIX_LEN: usize = 4;

/// An opened envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub message: Vec<u8>,
    /// Trailing tenant/application identifier.
    pub account_id: Vec<u8>,
}

/// Concatenate the envelope fields.
///
/// # Errors
///
/// Returns [`CryptoError::MalformedEnvelope`] if the message is too long for
/// a 32-bit length prefix.
pub fn pack(
    random: &[u8; RANDOM_PREFIX_LEN],
    message: &[u8],
    account_id: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let len = u32::try_from(message.len()).map_err(|_| {
        CryptoError::MalformedEnvelope(format!(
            "message of {} bytes exceeds the 32-bit length prefix",
            message.len()
        ))
    })?;
    let mut out =
        Vec::with_capacity(RANDOM_PREFIX_LEN + LENGTH_PREFIX_LEN + message.len() + account_id.len());
    out.extend_from_slice(random);
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(message);
    out.extend_from_slice(account_id);
    Ok(out)
}

/// Split an unpadded envelope back into message and account identifier.
///
/// # Errors
///
/// Returns [`CryptoError::MalformedEnvelope`] if the buffer is shorter than the
/// fixed header or the length prefix points past the end of the buffer.
pub fn unpack(plain: &[u8]) -> Result<Envelope, CryptoError> {
    let header_len = RANDOM_PREFIX_LEN + LENGTH_PREFIX_LEN;
    if plain.len() < header_len {
        return Err(CryptoError::MalformedEnvelope(format!(
            "envelope of {} bytes is shorter than its {header_len} byte header",
            plain.len()
        )));
    }
    let mut len_bytes = [0u8; LENGTH_PREFIX_LEN];
    len_bytes.copy_from_slice(&plain[RANDOM_PREFIX_LEN..header_len]);
    let declared = u32::from_be_bytes(len_bytes) as usize;

    let body = &plain[header_len..];
    if declared > body.len() {
        return Err(CryptoError::MalformedEnvelope(format!(
            "length prefix {declared} exceeds {} remaining bytes",
            body.len()
        )));
    }
    let (message, account_id) = body.split_at(declared);
    Ok(Envelope {
        message: message.to_vec(),
        account_id: account_id.to_vec(),
    })
}

/// Pack, pad, encrypt and base64-encode an envelope. The result contains no
/// newline characters.
///
/// # Errors
///
/// Propagates [`pack`] and cipher failures.
pub fn seal(
    key: &KeyMaterial,
    random: &[u8; RANDOM_PREFIX_LEN],
    message: &[u8],
    account_id: &[u8],
) -> Result<String, CryptoError> {
    let packed = pack(random, message, account_id)?;
    let ciphertext = cipher::encrypt(key, &padding::pad(&packed))?;
    let mut encoded = STANDARD.encode(ciphertext);
    encoded.retain(|c| c != '\n');
    Ok(encoded)
}

/// Base64-decode, decrypt, unpad and unpack a sealed envelope.
///
/// ASCII whitespace in the input is ignored.
///
/// # Errors
///
/// Returns [`CryptoError::Decoding`] for malformed base64,
/// [`CryptoError::Cipher`] for misaligned ciphertext and
/// [`CryptoError::MalformedEnvelope`] from [`unpack`].
pub fn open(key: &KeyMaterial, sealed: &str) -> Result<Envelope, CryptoError> {
    let compact: String = sealed.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let ciphertext = LENIENT_BASE64
        .decode(compact)
        .map_err(|e| CryptoError::Decoding(e.to_string()))?;
    let plain = cipher::decrypt(key, &ciphertext)?;
    unpack(padding::unpad(&plain))
}
