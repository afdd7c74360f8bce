//! Random byte sources and key generation.
//!
//! [`RandomSource`] is the seam the façades draw entropy through. The
//! blocking façade calls it inline; the async façade moves the call onto the
//! blocking thread pool with [`random_bytes_async`] so a slow entropy source
//! never stalls the runtime.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;

/// Default byte length of keys produced by [`generate_random_key`].
pub const DEFAULT_KEY_BYTES: usize = 32;

/// Errors produced while gathering random bytes.
#[derive(Debug, Error)]
pub enum RandomError {
    /// The underlying source could not produce bytes.
    #[error("random source failure: {0}")]
    Source(String),

    /// The blocking task that gathered the bytes panicked or was cancelled.
    #[error("random task failed: {0}")]
    Task(String),
}

/// A cryptographically secure source of random bytes.
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource: Send + Sync {
    /// Fill `dest` entirely with random bytes.
    fn fill(&self, dest: &mut [u8]) -> Result<(), RandomError>;
}

/// The operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, dest: &mut [u8]) -> Result<(), RandomError> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| RandomError::Source(e.to_string()))
    }
}

/// Draw `len` bytes from `source`.
pub fn random_bytes(source: &dyn RandomSource, len: usize) -> Result<Vec<u8>, RandomError> {
    let mut buf = vec![0u8; len];
    source.fill(&mut buf)?;
    Ok(buf)
}

/// Draw `len` bytes from `source` on the blocking thread pool.
///
/// # Errors
///
/// Returns [`RandomError::Task`] if the blocking task could not complete, or
/// whatever error the source itself reported.
pub async fn random_bytes_async(
    source: Arc<dyn RandomSource>,
    len: usize,
) -> Result<Vec<u8>, RandomError> {
    tokio::task::spawn_blocking(move || random_bytes(source.as_ref(), len))
        .await
        .map_err(|e| RandomError::Task(e.to_string()))?
}

/// Generate `len` random bytes from the OS CSPRNG and return them as base64.
///
/// Independent of any encryptor instance. Pass [`DEFAULT_KEY_BYTES`] for a key
/// suitable for AES-256-CBC.
pub fn generate_random_key(len: usize) -> Result<String, RandomError> {
    random_bytes(&OsRandom, len).map(|bytes| STANDARD.encode(bytes))
}

/// Async counterpart of [`generate_random_key`].
pub async fn generate_key(len: usize) -> Result<String, RandomError> {
    random_bytes_async(Arc::new(OsRandom), len)
        .await
        .map(|bytes| STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_key_decodes_to_requested_length() {
        for len in [16, DEFAULT_KEY_BYTES, 64] {
            let key = generate_random_key(len).unwrap();
            assert_eq!(STANDARD.decode(key).unwrap().len(), len);
        }
    }

    #[test]
    fn generated_keys_differ() {
        let a = generate_random_key(DEFAULT_KEY_BYTES).unwrap();
        let b = generate_random_key(DEFAULT_KEY_BYTES).unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn async_key_generation() {
        let key = generate_key(DEFAULT_KEY_BYTES).await.unwrap();
        assert_eq!(STANDARD.decode(key).unwrap().len(), DEFAULT_KEY_BYTES);
    }

    #[tokio::test]
    async fn async_bytes_come_from_the_source() {
        let mut mock = MockRandomSource::new();
        mock.expect_fill().times(1).returning(|dest| {
            dest.fill(0xAB);
            Ok(())
        });
        let bytes = random_bytes_async(Arc::new(mock), 4).await.unwrap();
        assert_eq!(bytes, vec![0xAB; 4]);
    }

    #[test]
    fn source_failure_propagates() {
        let mut mock = MockRandomSource::new();
        mock.expect_fill()
            .returning(|_| Err(RandomError::Source("exhausted".into())));
        let err = random_bytes(&mock, 8).unwrap_err();
        assert!(err.to_string().contains("exhausted"));
    }
}
