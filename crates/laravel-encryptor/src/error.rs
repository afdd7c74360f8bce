//! Conversions from collaborator errors into [`EncryptorError`] kinds.
//!
//! Every collaborator boundary goes through `?`, so these impls are the one
//! place foreign failures are classified. An `EncryptorError` is never
//! re-wrapped.

pub use common::EncryptorError;

use crate::crypto::{CipherError, MacError, RandomError};
use crate::serialize::SerializeError;

impl From<CipherError> for EncryptorError {
    fn from(e: CipherError) -> Self {
        EncryptorError::Cipher(e.to_string())
    }
}

impl From<RandomError> for EncryptorError {
    fn from(e: RandomError) -> Self {
        EncryptorError::Cipher(e.to_string())
    }
}

// Only reached while sealing. Verification maps MAC failures to
// `Authentication` itself.
impl From<MacError> for EncryptorError {
    fn from(e: MacError) -> Self {
        EncryptorError::Cipher(e.to_string())
    }
}

impl From<SerializeError> for EncryptorError {
    fn from(e: SerializeError) -> Self {
        EncryptorError::Serialization(e.to_string())
    }
}
