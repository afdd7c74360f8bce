//! Error kinds surfaced by every encryptor façade.

use thiserror::Error;

/// Top-level encryptor error type.
///
/// Every failure of an encrypt or decrypt call is reported as exactly one of
/// these kinds. Collaborator errors are folded into them at the library
/// boundary; a value that is already an `EncryptorError` passes through as is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncryptorError {
    /// Invalid key-size selector or undecodable key material.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The outer payload could not be decoded, a field is missing, or the IV
    /// has the wrong length.
    #[error("invalid payload: {0}")]
    PayloadFormat(String),

    /// The MAC did not match, or could not be computed during verification.
    #[error("the MAC is invalid")]
    Authentication,

    /// The block cipher or the random source failed.
    #[error("cipher failure: {0}")]
    Cipher(String),

    /// The serialization bridge rejected a value or a serialized string.
    #[error("serialization failure: {0}")]
    Serialization(String),

    /// The sync façade was called without any data to cipher.
    #[error("called without data to cipher")]
    MissingData,
}

impl EncryptorError {
    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            EncryptorError::Configuration(_) => "configuration_error",
            EncryptorError::PayloadFormat(_) => "payload_format_error",
            EncryptorError::Authentication => "authentication_error",
            EncryptorError::Cipher(_) => "cipher_error",
            EncryptorError::Serialization(_) => "serialization_error",
            EncryptorError::MissingData => "missing_data",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let codes = [
            EncryptorError::Configuration("x".into()).code(),
            EncryptorError::PayloadFormat("x".into()).code(),
            EncryptorError::Authentication.code(),
            EncryptorError::Cipher("x".into()).code(),
            EncryptorError::Serialization("x".into()).code(),
            EncryptorError::MissingData.code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn display_includes_message() {
        let e = EncryptorError::PayloadFormat("missing field `mac`".into());
        assert!(e.to_string().contains("missing field `mac`"));
        assert_eq!(EncryptorError::Authentication.to_string(), "the MAC is invalid");
    }
}
