//! Shared error type and protocol records for the `callback-crypto` workspace.

pub mod error;
pub mod protocol;

pub use error::CryptoError;
pub use protocol::{CiphertextSource, EncryptedReply, IncomingPayload};
