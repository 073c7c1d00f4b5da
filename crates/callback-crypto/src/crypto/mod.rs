//! Callback message encryption primitives.
//!
//! This module is free of transport concerns. It provides the pieces the
//! [`crate::encryptor`] facade composes:
//!
//! - [`key`]: derives the AES-256 key and IV from the 43-character encoding key
//! - [`padding`]: the platform's 32-byte block padding
//! - [`cipher`]: unpadded AES-256-CBC
//! - [`envelope`]: the plaintext envelope and its sealed base64 form
//! - [`signature`]: the order-insensitive SHA-1 message signature
//!
//! # Envelope format
//!
//! ```text
//! base64( AES-256-CBC( pad32( random[16] || len(msg) as u32 BE || msg || account_id ) ) )
//! ```

pub mod cipher;
pub mod envelope;
pub mod key;
pub mod padding;
pub mod signature;

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};

pub use key::{KeyMaterial, KEY_LEN};

/// Standard-alphabet base64 that decodes as leniently as the platform's own
/// decoders: non-canonical trailing bits and missing padding are accepted.
/// Encoding always emits padding.
pub(crate) const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);
