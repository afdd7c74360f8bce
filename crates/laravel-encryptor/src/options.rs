//! Encryptor options.
//!
//! Options are plain data: they can be built in code with the `with_*`
//! helpers or deserialised from any `serde` source (the CLI reads them from
//! the environment). Validation happens when an encryptor is constructed.

use serde::Deserialize;
use tracing::warn;

use common::EncryptorError;

use crate::crypto::{iv::DEFAULT_RANDOM_BYTES, Algorithm, SecretKey};
use crate::serialize::SerializeMode;

/// Whether the async façade authenticates payloads before deciphering.
///
/// The blocking façade always verifies; this only affects [`crate::Encryptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacPolicy {
    /// Check the MAC in constant time and fail with
    /// [`EncryptorError::Authentication`] on mismatch.
    #[default]
    Verify,
    /// Decipher without checking the MAC. Tampering only shows up as a cipher
    /// error or garbled output.
    Skip,
}

/// Configuration for an encryptor instance.
#[derive(Clone, Deserialize)]
pub struct Options {
    /// Base64 secret. **Required** unless `laravel_key` is set.
    #[serde(default)]
    pub key: String,

    /// Deprecated alias for `key`; takes precedence when present.
    #[serde(default)]
    pub laravel_key: Option<String>,

    /// Key-size selector in hex characters: `32` (AES-128) or `64` (AES-256).
    #[serde(default)]
    pub key_length: Option<u32>,

    /// Random bytes drawn per IV.
    #[serde(default = "default_random_bytes")]
    pub random_bytes: usize,

    #[serde(default)]
    pub serialize_mode: SerializeMode,

    #[serde(default)]
    pub mac_policy: MacPolicy,
}

fn default_random_bytes() -> usize {
    DEFAULT_RANDOM_BYTES
}

impl Options {
    /// Options for `key` with every other field at its default.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            laravel_key: None,
            key_length: None,
            random_bytes: default_random_bytes(),
            serialize_mode: SerializeMode::default(),
            mac_policy: MacPolicy::default(),
        }
    }

    pub fn with_key_length(mut self, key_length: u32) -> Self {
        self.key_length = Some(key_length);
        self
    }

    pub fn with_random_bytes(mut self, random_bytes: usize) -> Self {
        self.random_bytes = random_bytes;
        self
    }

    pub fn with_serialize_mode(mut self, mode: SerializeMode) -> Self {
        self.serialize_mode = mode;
        self
    }

    pub fn with_mac_policy(mut self, policy: MacPolicy) -> Self {
        self.mac_policy = policy;
        self
    }

    /// Resolve the configured key-size selector.
    pub fn algorithm(&self) -> Result<Algorithm, EncryptorError> {
        Algorithm::resolve(self.key_length)
    }

    /// Decode the configured secret, preferring the deprecated `laravel_key`.
    ///
    /// # Errors
    ///
    /// Returns [`EncryptorError::Configuration`] if no key is set or it is not
    /// valid base64.
    pub fn secret(&self) -> Result<SecretKey, EncryptorError> {
        match &self.laravel_key {
            Some(legacy) => {
                warn!("laravel_key is deprecated, use key instead");
                SecretKey::from_base64(legacy)
            }
            None => SecretKey::from_base64(&self.key),
        }
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("key", &"[REDACTED]")
            .field("laravel_key", &self.laravel_key.as_ref().map(|_| "[REDACTED]"))
            .field("key_length", &self.key_length)
            .field("random_bytes", &self.random_bytes)
            .field("serialize_mode", &self.serialize_mode)
            .field("mac_policy", &self.mac_policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "LQUcxdgHIEiBAixaJ8BInmXRHdKLOacDXMEBLU0Ci/o=";

    #[test]
    fn defaults_are_correct() {
        let opts = Options::new(KEY);
        assert_eq!(opts.random_bytes, 8);
        assert_eq!(opts.serialize_mode, SerializeMode::Php);
        assert_eq!(opts.mac_policy, MacPolicy::Verify);
        assert_eq!(opts.algorithm().unwrap(), Algorithm::Aes256Cbc);
    }

    #[test]
    fn deserialises_with_defaults() {
        let opts: Options = serde_json::from_str(&format!(r#"{{"key":"{KEY}"}}"#)).unwrap();
        assert_eq!(opts.random_bytes, 8);
        assert_eq!(opts.key_length, None);
        assert_eq!(opts.secret().unwrap().len(), 32);
    }

    #[test]
    fn deserialises_every_field() {
        let json = format!(
            r#"{{"key":"{KEY}","key_length":32,"random_bytes":8,"serialize_mode":"json","mac_policy":"skip"}}"#
        );
        let opts: Options = serde_json::from_str(&json).unwrap();
        assert_eq!(opts.algorithm().unwrap(), Algorithm::Aes128Cbc);
        assert_eq!(opts.serialize_mode, SerializeMode::Json);
        assert_eq!(opts.mac_policy, MacPolicy::Skip);
    }

    #[test]
    fn laravel_key_takes_precedence() {
        let mut opts = Options::new("");
        opts.laravel_key = Some(KEY.into());
        assert_eq!(opts.secret().unwrap().len(), 32);
    }

    #[test]
    fn missing_key_is_configuration_error() {
        assert!(matches!(
            Options::new("").secret(),
            Err(EncryptorError::Configuration(_))
        ));
    }

    #[test]
    fn invalid_selector_is_configuration_error() {
        assert!(matches!(
            Options::new(KEY).with_key_length(48).algorithm(),
            Err(EncryptorError::Configuration(_))
        ));
    }

    #[test]
    fn debug_redacts_key() {
        let shown = format!("{:?}", Options::new(KEY));
        assert!(!shown.contains(KEY));
        assert!(shown.contains("REDACTED"));
    }
}
