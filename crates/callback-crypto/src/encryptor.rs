//! [`MessageEncryptor`]: the encrypt/decrypt/sign facade used by callback handlers.
//!
//! # Signature verification is the caller's job
//!
//! [`MessageEncryptor::decrypt_message`] **computes but does not verify** the
//! message signature. It returns the recomputed signature alongside the
//! plaintext; the caller must compare it with the `msg_signature` supplied by
//! the platform and reject the message on mismatch. Callers that want the
//! comparison done for them use [`MessageEncryptor::decrypt_and_verify`].

use common::{CryptoError, EncryptedReply, IncomingPayload};
use tracing::{debug, warn};

use crate::config::Credentials;
use crate::crypto::envelope::{self, RANDOM_PREFIX_LEN};
use crate::crypto::signature::{self, signatures_match};
use crate::crypto::KeyMaterial;
use crate::source::{Clock, OsRandom, RandomSource, SystemClock};

/// A decrypted inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptedMessage {
    /// Raw message bytes, usually an XML document.
    pub message: Vec<u8>,
    /// Account identifier carried in the envelope.
    pub account_id: String,
    /// Signature recomputed over the inbound ciphertext, timestamp and nonce.
    pub signature: String,
}

impl DecryptedMessage {
    /// The message as UTF-8 text.
    pub fn message_str(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.message)
    }
}

/// Encrypts, decrypts and signs callback messages for one credential set.
///
/// Key material is derived once in the constructor and never mutated, so a
/// single instance can be shared across threads.
pub struct MessageEncryptor<R = OsRandom, C = SystemClock> {
    key: KeyMaterial,
    sign_token: String,
    app_id: String,
    random: R,
    clock: C,
}

impl MessageEncryptor {
    /// Build an encryptor backed by the OS CSPRNG and the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Configuration`] if the encoding key does not
    /// decode to 32 bytes or the token or app id is empty.
    pub fn new(
        encoding_aes_key: &str,
        sign_token: impl Into<String>,
        app_id: impl Into<String>,
    ) -> Result<Self, CryptoError> {
        Self::with_sources(encoding_aes_key, sign_token, app_id, OsRandom, SystemClock)
    }

    /// Build an encryptor from loaded [`Credentials`].
    pub fn from_credentials(credentials: &Credentials) -> Result<Self, CryptoError> {
        Self::new(
            &credentials.encoding_aes_key,
            credentials.sign_token.clone(),
            credentials.app_id.clone(),
        )
    }
}

impl<R: RandomSource, C: Clock> MessageEncryptor<R, C> {
    /// Build an encryptor with explicit randomness and time sources.
    pub fn with_sources(
        encoding_aes_key: &str,
        sign_token: impl Into<String>,
        app_id: impl Into<String>,
        random: R,
        clock: C,
    ) -> Result<Self, CryptoError> {
        let sign_token = sign_token.into();
        let app_id = app_id.into();
        if sign_token.is_empty() {
            return Err(CryptoError::Configuration("sign token is required".into()));
        }
        if app_id.is_empty() {
            return Err(CryptoError::Configuration("app id is required".into()));
        }
        let key = KeyMaterial::from_encoding_key(encoding_aes_key)?;
        Ok(Self {
            key,
            sign_token,
            app_id,
            random,
            clock,
        })
    }

    /// The account identifier embedded in outgoing envelopes.
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Seal `plaintext` into a base64 ciphertext with no newline characters.
    pub fn encrypt_message(&self, plaintext: impl AsRef<[u8]>) -> Result<String, CryptoError> {
        let plaintext = plaintext.as_ref();
        let prefix = self.random.hex16();
        let random: &[u8; RANDOM_PREFIX_LEN] = prefix.as_bytes().try_into().map_err(|_| {
            CryptoError::Configuration(format!(
                "random source yielded {} bytes, expected {RANDOM_PREFIX_LEN}",
                prefix.len()
            ))
        })?;
        let sealed = envelope::seal(&self.key, random, plaintext, self.app_id.as_bytes())?;
        debug!(
            plaintext_len = plaintext.len(),
            ciphertext_len = sealed.len(),
            "message encrypted"
        );
        Ok(sealed)
    }

    /// Encrypt `plaintext` and sign it with the current time and a fresh nonce.
    pub fn encrypt_with_signature(
        &self,
        plaintext: impl AsRef<[u8]>,
    ) -> Result<EncryptedReply, CryptoError> {
        let ciphertext = self.encrypt_message(plaintext)?;
        let timestamp = self.clock.unix_seconds().to_string();
        let nonce = self.random.hex16();
        let signature = self.sign(&ciphertext, &timestamp, &nonce);
        Ok(EncryptedReply {
            ciphertext,
            timestamp,
            nonce,
            signature,
        })
    }

    /// Encrypt and sign `plaintext`, rendered as the XML reply body.
    pub fn encrypt_to_wire_format(&self, plaintext: impl AsRef<[u8]>) -> Result<String, CryptoError> {
        Ok(self.encrypt_with_signature(plaintext)?.to_xml())
    }

    /// Signature over `ciphertext`, the shared token, `timestamp` and `nonce`.
    pub fn sign(&self, ciphertext: &str, timestamp: &str, nonce: &str) -> String {
        signature::sign(ciphertext, &self.sign_token, timestamp, nonce)
    }

    /// Decrypt an inbound payload and recompute its signature.
    ///
    /// **The signature is not verified.** Compare
    /// [`DecryptedMessage::signature`] with the platform-supplied
    /// `msg_signature` and treat a mismatch as an authentication failure, or
    /// use [`Self::decrypt_and_verify`].
    pub fn decrypt_message(
        &self,
        payload: &IncomingPayload,
    ) -> Result<DecryptedMessage, CryptoError> {
        let ciphertext = payload.source.ciphertext();
        let signature = self.sign(ciphertext, &payload.timestamp, &payload.nonce);
        let opened = envelope::open(&self.key, ciphertext)?;
        let account_id = String::from_utf8(opened.account_id).map_err(|_| {
            CryptoError::MalformedEnvelope("account id is not valid UTF-8".into())
        })?;
        debug!(
            message_len = opened.message.len(),
            echo_probe = matches!(payload.source, common::CiphertextSource::EchoProbe(_)),
            "message decrypted"
        );
        Ok(DecryptedMessage {
            message: opened.message,
            account_id,
            signature,
        })
    }

    /// Verify the payload's `msg_signature`, then decrypt.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MissingSignature`] if the payload has no
    /// `msg_signature`, [`CryptoError::SignatureMismatch`] if it differs from
    /// the recomputed signature, and any [`Self::decrypt_message`] error.
    pub fn decrypt_and_verify(
        &self,
        payload: &IncomingPayload,
    ) -> Result<DecryptedMessage, CryptoError> {
        let supplied = payload
            .msg_signature
            .as_deref()
            .ok_or(CryptoError::MissingSignature)?;
        let computed = self.sign(payload.source.ciphertext(), &payload.timestamp, &payload.nonce);
        if !signatures_match(&computed, supplied) {
            warn!(timestamp = %payload.timestamp, "inbound message signature mismatch");
            return Err(CryptoError::SignatureMismatch);
        }
        self.decrypt_message(payload)
    }
}

impl<R, C> std::fmt::Debug for MessageEncryptor<R, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageEncryptor")
            .field("key", &self.key)
            .field("sign_token", &"[REDACTED]")
            .field("app_id", &self.app_id)
            .finish_non_exhaustive()
    }
}
