//! Envelope construction, outer transport encoding and structural checks.
//!
//! # Wire format
//!
//! ```text
//! base64( {"iv":"<base64 iv>","value":"<base64 ciphertext>","mac":"<hex hmac>"} )
//! ```
//!
//! All base64 uses the standard padded alphabet.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::{EncryptorError, Envelope};

use crate::crypto::{mac, MacError, IV_LEN};

/// Build an envelope for an IV and ciphertext, computing its MAC with `key`.
pub fn encode(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Envelope, MacError> {
    let iv = STANDARD.encode(iv);
    let value = STANDARD.encode(ciphertext);
    let mac = mac::compute(key, &iv, &value)?;
    Ok(Envelope { iv, value, mac })
}

/// JSON-encode the envelope, then base64-encode the JSON text.
pub fn serialize_outer(envelope: &Envelope) -> Result<String, EncryptorError> {
    let json = serde_json::to_vec(envelope)
        .map_err(|e| EncryptorError::PayloadFormat(format!("cannot encode envelope: {e}")))?;
    Ok(STANDARD.encode(json))
}

/// Base64-decode and JSON-parse an outer payload.
///
/// Only checks that the three fields exist and are strings. Use
/// [`parse_outer`] to also enforce the IV length.
///
/// # Errors
///
/// Returns [`EncryptorError::PayloadFormat`] on a base64 or JSON failure or a
/// missing field.
pub fn decode_outer(payload: &str) -> Result<Envelope, EncryptorError> {
    let json = STANDARD
        .decode(payload.trim())
        .map_err(|e| EncryptorError::PayloadFormat(format!("payload is not valid base64: {e}")))?;
    serde_json::from_slice(&json)
        .map_err(|e| EncryptorError::PayloadFormat(format!("cannot parse payload json: {e}")))
}

/// [`decode_outer`] followed by [`check_structure`].
pub fn parse_outer(payload: &str) -> Result<Envelope, EncryptorError> {
    let envelope = decode_outer(payload)?;
    check_structure(&envelope)?;
    Ok(envelope)
}

/// Reject an envelope whose `iv` does not decode to exactly [`IV_LEN`] bytes.
pub fn check_structure(envelope: &Envelope) -> Result<(), EncryptorError> {
    let iv = iv_bytes(envelope)?;
    if iv.len() != IV_LEN {
        return Err(EncryptorError::PayloadFormat(format!(
            "iv must be {IV_LEN} bytes, got {}",
            iv.len()
        )));
    }
    Ok(())
}

/// Decoded IV bytes of an envelope.
pub fn iv_bytes(envelope: &Envelope) -> Result<Vec<u8>, EncryptorError> {
    STANDARD
        .decode(&envelope.iv)
        .map_err(|e| EncryptorError::PayloadFormat(format!("iv is not valid base64: {e}")))
}

/// Decoded ciphertext bytes of an envelope.
pub fn ciphertext_bytes(envelope: &Envelope) -> Result<Vec<u8>, EncryptorError> {
    STANDARD
        .decode(&envelope.value)
        .map_err(|e| EncryptorError::PayloadFormat(format!("value is not valid base64: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = &[7u8; 32];

    fn sample() -> Envelope {
        encode(KEY, b"0001020304050607", &[0u8; 16]).unwrap()
    }

    fn outer_json(json: &str) -> String {
        STANDARD.encode(json)
    }

    #[test]
    fn encode_fills_every_field() {
        let env = sample();
        assert_eq!(env.iv, "MDAwMTAyMDMwNDA1MDYwNw==");
        assert_eq!(STANDARD.decode(&env.value).unwrap(), vec![0u8; 16]);
        assert!(mac::verify(KEY, &env.iv, &env.value, &env.mac));
    }

    #[test]
    fn outer_round_trip() {
        let env = sample();
        let outer = serialize_outer(&env).unwrap();
        assert_eq!(parse_outer(&outer).unwrap(), env);
    }

    #[test]
    fn outer_is_base64_of_ordered_json() {
        let env = sample();
        let outer = serialize_outer(&env).unwrap();
        let json = String::from_utf8(STANDARD.decode(outer).unwrap()).unwrap();
        assert!(json.starts_with(r#"{"iv":"#));
        assert!(json.find(r#""value""#).unwrap() < json.find(r#""mac""#).unwrap());
    }

    #[test]
    fn rejects_non_base64() {
        assert!(matches!(
            decode_outer("%%% not base64 %%%"),
            Err(EncryptorError::PayloadFormat(_))
        ));
    }

    #[test]
    fn rejects_non_json() {
        assert!(matches!(
            decode_outer(&outer_json("not json")),
            Err(EncryptorError::PayloadFormat(_))
        ));
    }

    #[test]
    fn rejects_missing_field() {
        let outer = outer_json(r#"{"iv":"MDAwMTAyMDMwNDA1MDYwNw==","value":"AAAA"}"#);
        assert!(matches!(
            decode_outer(&outer),
            Err(EncryptorError::PayloadFormat(_))
        ));
    }

    #[test]
    fn rejects_short_iv() {
        let outer = outer_json(r#"{"iv":"MDAwMTAyMDM=","value":"AAAA","mac":"00"}"#);
        // Decodes fine, fails the structural check.
        assert!(decode_outer(&outer).is_ok());
        match parse_outer(&outer) {
            Err(EncryptorError::PayloadFormat(msg)) => assert!(msg.contains("16 bytes")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
