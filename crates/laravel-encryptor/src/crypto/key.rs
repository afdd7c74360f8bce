//! [`SecretKey`]: owned key material that wipes itself on drop.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::EncryptorError;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Raw secret bytes decoded from the configured base64 key.
///
/// Shared by the cipher and the MAC. When this value is dropped the buffer is
/// overwritten with zeroes.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey(Vec<u8>);

impl SecretKey {
    /// Wrap raw key bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Decode a base64 key string.
    ///
    /// # Errors
    ///
    /// Returns [`EncryptorError::Configuration`] if `encoded` is empty or not
    /// valid base64.
    pub fn from_base64(encoded: &str) -> Result<Self, EncryptorError> {
        let trimmed = encoded.trim();
        if trimmed.is_empty() {
            return Err(EncryptorError::Configuration(
                "key is required and must not be empty".into(),
            ));
        }
        STANDARD
            .decode(trimmed)
            .map(Self)
            .map_err(|e| EncryptorError::Configuration(format!("key is not valid base64: {e}")))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material, not even in debug builds.
        write!(f, "SecretKey([REDACTED; {}])", self.0.len())
    }
}
