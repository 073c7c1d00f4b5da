//! The platform's block padding.
//!
//! Padding is applied over a 32-byte block, not the 16-byte AES block, so this
//! is not PKCS#7 as the cipher would apply it. Every pad byte holds the pad
//! length, and a full block of padding is appended when the input is already
//! aligned.

use tracing::debug;

/// Padding block size in bytes.
pub const BLOCK_SIZE: usize = 32;

/// Append `n` bytes of value `n`, where `n = 32 - len % 32` (so `1..=32`).
pub fn pad(bytes: &[u8]) -> Vec<u8> {
    let mut amount = BLOCK_SIZE - (bytes.len() % BLOCK_SIZE);
    if amount == 0 {
        amount = BLOCK_SIZE;
    }
    let mut out = Vec::with_capacity(bytes.len() + amount);
    out.extend_from_slice(bytes);
    // `amount` is at most 32, so the cast cannot truncate.
    out.resize(bytes.len() + amount, amount as u8);
    out
}

/// Strip the padding indicated by the last byte.
///
/// A last byte outside `1..=32` means no padding is present and the input is
/// returned whole. The platform tolerates such payloads, so this is not an
/// error.
pub fn unpad(bytes: &[u8]) -> &[u8] {
    let Some(&last) = bytes.last() else {
        return bytes;
    };
    let amount = usize::from(last);
    if !(1..=BLOCK_SIZE).contains(&amount) {
        debug!(pad_byte = last, "pad byte out of range; treating as unpadded");
        return bytes;
    }
    &bytes[..bytes.len().saturating_sub(amount)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn aligned_input_gets_full_block() {
        let padded = pad(&[7u8; BLOCK_SIZE]);
        assert_eq!(padded.len(), 2 * BLOCK_SIZE);
        assert!(padded[BLOCK_SIZE..].iter().all(|&b| b == 32));
    }

    #[test]
    fn empty_input_gets_full_block() {
        assert_eq!(pad(&[]), vec![32u8; BLOCK_SIZE]);
    }

    #[test]
    fn pads_to_next_boundary() {
        let padded = pad(b"plain text message");
        assert_eq!(padded.len(), BLOCK_SIZE);
        assert!(padded[18..].iter().all(|&b| b == 14));
    }

    #[test]
    fn out_of_range_pad_byte_is_no_padding() {
        let mut data = vec![1u8; 31];
        data.push(0);
        assert_eq!(unpad(&data), data.as_slice());

        data.pop();
        data.push(33);
        assert_eq!(unpad(&data), data.as_slice());
    }

    #[test]
    fn pad_longer_than_input_yields_empty() {
        assert_eq!(unpad(&[5, 5]), &[] as &[u8]);
    }

    #[test]
    fn unpad_empty_is_empty() {
        assert!(unpad(&[]).is_empty());
    }

    proptest! {
        #[test]
        fn prop_unpad_inverts_pad(data in prop::collection::vec(any::<u8>(), 0..300)) {
            let padded = pad(&data);
            prop_assert!(padded.len() > data.len());
            prop_assert_eq!(padded.len() % BLOCK_SIZE, 0);
            prop_assert_eq!(unpad(&padded), data.as_slice());
        }
    }
}
