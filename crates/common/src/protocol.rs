//! Wire types exchanged between encryptor implementations.
//!
//! The [`Envelope`] is the Laravel-compatible `{iv, value, mac}` object. It is
//! JSON-encoded and then base64-encoded as a whole before transport.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// One encrypted message.
///
/// Field declaration order is significant: it fixes the JSON key order to
/// `iv`, `value`, `mac`, which keeps the outer encoding byte-identical to
/// other implementations for the same IV and plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Base64 of the raw IV bytes.
    pub iv: String,
    /// Base64 of the ciphertext bytes.
    pub value: String,
    /// Lowercase hex HMAC-SHA256 over `iv` followed by `value`.
    pub mac: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Error body printed by command-line front ends on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"authentication_error"`).
    pub code: String,
    /// Human-readable description, never containing key material.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::EncryptorError> for ErrorResponse {
    fn from(e: &crate::EncryptorError) -> Self {
        Self::new(e.code(), e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EncryptorError;

    #[test]
    fn envelope_serialises_in_wire_order() {
        let env = Envelope {
            iv: "aXY=".into(),
            value: "dmFsdWU=".into(),
            mac: "00ff".into(),
        };
        let json = serde_json::to_string(&env).unwrap();
        assert_eq!(json, r#"{"iv":"aXY=","value":"dmFsdWU=","mac":"00ff"}"#);
    }

    #[test]
    fn envelope_ignores_unknown_fields() {
        let json = r#"{"iv":"a","value":"b","mac":"c","tag":""}"#;
        let env: Envelope = serde_json::from_str(json).unwrap();
        assert_eq!(env.mac, "c");
    }

    #[test]
    fn envelope_requires_every_field() {
        let json = r#"{"iv":"a","value":"b"}"#;
        assert!(serde_json::from_str::<Envelope>(json).is_err());
    }

    #[test]
    fn error_response_from_encryptor_error() {
        let e = ErrorResponse::from(&EncryptorError::Authentication);
        assert_eq!(e.code, "authentication_error");
        assert!(e.message.contains("MAC"));
    }
}
