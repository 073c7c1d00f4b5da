//! Common error type shared across crates.

use thiserror::Error;

/// Top-level error type for every callback encryption operation.
///
/// Variants map to how a callback endpoint should react:
/// - [`CryptoError::Configuration`] → the service is misconfigured; fail at startup
/// - [`CryptoError::SignatureMismatch`] / [`CryptoError::MissingSignature`] → reject as unauthenticated
/// - everything else → reject the inbound request as malformed
///
/// Padding-byte range violations are deliberately absent: unpadding treats them
/// as "no padding present" instead of failing.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key material did not decode to 32 bytes, or a credential is absent.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Base64 input could not be decoded.
    #[error("decoding error: {0}")]
    Decoding(String),

    /// Block alignment was violated or the cipher could not be set up.
    #[error("cipher error: {0}")]
    Cipher(String),

    /// The decrypted envelope is structurally invalid, e.g. its length prefix
    /// points past the end of the buffer.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// The incoming payload carries neither `echostr` nor `xml.Encrypt`.
    #[error("incoming payload carries no ciphertext")]
    MissingCiphertext,

    /// Verification was requested but the payload carries no `msg_signature`.
    #[error("incoming payload carries no msg_signature")]
    MissingSignature,

    /// The signature supplied with the payload differs from the recomputed one.
    #[error("message signature mismatch")]
    SignatureMismatch,
}

impl CryptoError {
    /// Returns `true` when the error means the message failed authentication
    /// and must be rejected as untrusted rather than as malformed.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            CryptoError::SignatureMismatch | CryptoError::MissingSignature
        )
    }
}
