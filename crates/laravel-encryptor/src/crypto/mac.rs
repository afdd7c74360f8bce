//! HMAC-SHA256 over the envelope's text fields.
//!
//! The tag covers the UTF-8 bytes of `base64(iv)` immediately followed by
//! `base64(ciphertext)`, exactly as they appear in the envelope, and is
//! rendered as lowercase hex.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Errors produced by the MAC engine.
#[derive(Debug, Error)]
pub enum MacError {
    #[error("HMAC key rejected")]
    InvalidKey,
}

/// Compute the lowercase hex MAC for an envelope's `iv` and `value` fields.
pub fn compute(key: &[u8], iv_b64: &str, value_b64: &str) -> Result<String, MacError> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| MacError::InvalidKey)?;
    mac.update(iv_b64.as_bytes());
    mac.update(value_b64.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Compare two byte strings without leaking where they differ.
///
/// Inputs of different length compare unequal immediately.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Check `supplied` against the MAC computed for `iv_b64` and `value_b64`.
///
/// A failure to compute the MAC counts as a mismatch.
pub fn verify(key: &[u8], iv_b64: &str, value_b64: &str, supplied: &str) -> bool {
    match compute(key, iv_b64, value_b64) {
        Ok(calculated) => constant_time_eq(calculated.as_bytes(), supplied.as_bytes()),
        Err(_) => false,
    }
}
