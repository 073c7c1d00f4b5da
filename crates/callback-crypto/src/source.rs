//! Randomness and time sources used by the encryptor.
//!
//! Production code uses [`OsRandom`] and [`SystemClock`]; tests substitute
//! mocks to pin the envelope prefix, nonce and timestamp.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::{rngs::OsRng, RngCore};

/// Source of random hex strings for envelope prefixes and nonces.
///
/// Implementations must be cryptographically secure.
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource {
    /// 8 random bytes rendered as 16 lowercase hex characters.
    fn hex16(&self) -> String;
}

/// [`RandomSource`] backed by the OS CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn hex16(&self) -> String {
        let mut bytes = [0u8; 8];
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}

/// Wall clock, in whole seconds since the Unix epoch.
#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    fn unix_seconds(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    }
}
