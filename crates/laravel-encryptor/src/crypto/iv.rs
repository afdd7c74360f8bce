//! IV derivation.
//!
//! The wire format does not use the random bytes directly as the IV. It
//! draws `n` random bytes, hex-encodes them, and feeds the ASCII bytes of the
//! hex text to the cipher. With the default `n = 8` that yields the 16-byte IV
//! AES-CBC needs, carrying only 8 bytes of entropy. Other implementations of
//! the format derive their IV the same way, so the rule is reproduced as is.

use std::sync::Arc;

use super::random::{random_bytes, random_bytes_async, RandomError, RandomSource};

/// Default number of random bytes drawn per IV.
pub const DEFAULT_RANDOM_BYTES: usize = 8;

/// Expand raw random bytes into the IV bytes the cipher consumes.
///
/// Each input byte becomes two lowercase hex digits, so the output is twice
/// as long as the input.
pub fn materialize(raw: &[u8]) -> Vec<u8> {
    hex::encode(raw).into_bytes()
}

/// Produces IVs from a configured number of random bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IvDeriver {
    random_bytes: usize,
}

impl IvDeriver {
    /// A zero count falls back to [`DEFAULT_RANDOM_BYTES`].
    pub fn new(random_bytes: usize) -> Self {
        let random_bytes = if random_bytes == 0 {
            DEFAULT_RANDOM_BYTES
        } else {
            random_bytes
        };
        Self { random_bytes }
    }

    pub fn random_bytes(&self) -> usize {
        self.random_bytes
    }

    /// Length of the IVs this deriver produces.
    pub fn iv_len(&self) -> usize {
        self.random_bytes * 2
    }

    pub fn derive(&self, source: &dyn RandomSource) -> Result<Vec<u8>, RandomError> {
        random_bytes(source, self.random_bytes).map(|raw| materialize(&raw))
    }

    pub async fn derive_async(&self, source: Arc<dyn RandomSource>) -> Result<Vec<u8>, RandomError> {
        random_bytes_async(source, self.random_bytes)
            .await
            .map(|raw| materialize(&raw))
    }
}

impl Default for IvDeriver {
    fn default() -> Self {
        Self::new(DEFAULT_RANDOM_BYTES)
    }
}
