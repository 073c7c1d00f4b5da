//! Message signature: SHA-1 over the byte-wise sorted concatenation of
//! ciphertext, token, timestamp and nonce.
//!
//! Sorting removes positional dependence, so the signature only depends on
//! the multiset of the four inputs.

use sha1::{Digest, Sha1};

/// Compute the lowercase hex signature of the four inputs.
pub fn sign(ciphertext: &str, token: &str, timestamp: &str, nonce: &str) -> String {
    let mut parts = [ciphertext, token, timestamp, nonce];
    parts.sort_unstable();
    let mut hasher = Sha1::new();
    for part in parts {
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Compare two signatures without short-circuiting on the first differing byte.
pub fn signatures_match(computed: &str, supplied: &str) -> bool {
    let (a, b) = (computed.as_bytes(), supplied.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
