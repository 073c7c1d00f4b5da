//! `callback-crypto` — message encryption for enterprise messaging callback APIs.
//!
//! Outgoing XML replies are sealed into the platform's envelope, encrypted with
//! AES-256-CBC and signed; incoming callbacks are decrypted and their signature
//! recomputed.
//!
//! ```no_run
//! use callback_crypto::{Credentials, MessageEncryptor};
//!
//! # fn main() -> anyhow::Result<()> {
//! let credentials = Credentials::from_env()?;
//! let encryptor = MessageEncryptor::from_credentials(&credentials)?;
//! let body = encryptor.encrypt_to_wire_format("<xml>...</xml>")?;
//! # let _ = body;
//! # Ok(())
//! # }
//! ```
//!
//! Decryption never checks the inbound signature on its own; see
//! [`encryptor`] for the verification contract.

pub mod config;
pub mod crypto;
pub mod encryptor;
pub mod source;
pub mod telemetry;

pub use common::{CiphertextSource, CryptoError, EncryptedReply, IncomingPayload};
pub use config::Credentials;
pub use encryptor::{DecryptedMessage, MessageEncryptor};
pub use source::{Clock, OsRandom, RandomSource, SystemClock};
