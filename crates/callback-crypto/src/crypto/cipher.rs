//! AES-256-CBC with cipher-level padding disabled.
//!
//! Padding is owned entirely by [`super::padding`]; this layer only accepts
//! block-aligned input.

use cbc::cipher::{block_padding::NoPadding, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use common::CryptoError;
use thiserror::Error;

use super::key::KeyMaterial;
use super::padding::BLOCK_SIZE as PAD_BLOCK_SIZE;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Native AES block size in bytes.
pub const AES_BLOCK_SIZE: usize = 16;

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// Input length is not a multiple of the required block size.
    #[error("input of {len} bytes is not aligned to {block} byte blocks")]
    Misaligned { len: usize, block: usize },

    /// The key or IV was rejected by the cipher.
    #[error("invalid key or IV length")]
    InvalidKey,
}

impl From<CipherError> for CryptoError {
    fn from(e: CipherError) -> Self {
        CryptoError::Cipher(e.to_string())
    }
}

/// Encrypt padded plaintext. The length must be a multiple of 32.
///
/// # Errors
///
/// Returns [`CipherError::Misaligned`] if the plaintext was not padded.
pub fn encrypt(key: &KeyMaterial, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
    if plaintext.len() % PAD_BLOCK_SIZE != 0 {
        return Err(CipherError::Misaligned {
            len: plaintext.len(),
            block: PAD_BLOCK_SIZE,
        });
    }
    let cipher = Aes256CbcEnc::new_from_slices(key.key(), key.iv())
        .map_err(|_| CipherError::InvalidKey)?;
    Ok(cipher.encrypt_padded_vec_mut::<NoPadding>(plaintext))
}

/// Decrypt ciphertext. The length must be a multiple of 16. The returned
/// plaintext still carries its padding.
///
/// # Errors
///
/// Returns [`CipherError::Misaligned`] if the ciphertext is not block-aligned.
pub fn decrypt(key: &KeyMaterial, ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
    let misaligned = || CipherError::Misaligned {
        len: ciphertext.len(),
        block: AES_BLOCK_SIZE,
    };
    if ciphertext.len() % AES_BLOCK_SIZE != 0 {
        return Err(misaligned());
    }
    let cipher = Aes256CbcDec::new_from_slices(key.key(), key.iv())
        .map_err(|_| CipherError::InvalidKey)?;
    cipher
        .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
        .map_err(|_| misaligned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> KeyMaterial {
        KeyMaterial::from_encoding_key("djd2WiYRvgqbCUwzeFojrmAP6uhoA8qZXDrwYQJ6fUM").unwrap()
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let plaintext = [0x42u8; 64];
        let ciphertext = encrypt(&key(), &plaintext).unwrap();
        assert_eq!(ciphertext.len(), plaintext.len());
        assert_ne!(ciphertext.as_slice(), plaintext.as_slice());
        assert_eq!(decrypt(&key(), &ciphertext).unwrap(), plaintext);
    }

    #[test]
    fn encrypt_rejects_unpadded_input() {
        // 16-byte aligned but not 32-byte aligned.
        let err = encrypt(&key(), &[0u8; 48]).unwrap_err();
        assert!(matches!(err, CipherError::Misaligned { len: 48, block: 32 }));
    }

    #[test]
    fn decrypt_accepts_native_block_alignment() {
        assert_eq!(decrypt(&key(), &[0u8; 48]).unwrap().len(), 48);
    }

    #[test]
    fn decrypt_rejects_misaligned_input() {
        let err = decrypt(&key(), &[0u8; 17]).unwrap_err();
        assert!(matches!(err, CipherError::Misaligned { len: 17, block: 16 }));
    }

    #[test]
    fn wrong_key_does_not_recover_plaintext() {
        let other =
            KeyMaterial::from_encoding_key("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA").unwrap();
        let ciphertext = encrypt(&key(), &[9u8; 32]).unwrap();
        assert_ne!(decrypt(&other, &ciphertext).unwrap(), vec![9u8; 32]);
    }
}
