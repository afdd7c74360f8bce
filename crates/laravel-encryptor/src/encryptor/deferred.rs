//! [`Encryptor`]: the async façade.
//!
//! Construction never fails. Configuration problems are kept and returned
//! from every later call, so failures always arrive through the returned
//! future and never at construction time.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use super::{plain_text, Checks, Core};
use crate::crypto::{random, Algorithm, OsRandom, RandomSource};
use crate::error::EncryptorError;
use crate::options::{MacPolicy, Options};
use crate::serialize::DecodePolicy;

/// Async Laravel-compatible encryptor.
///
/// Cheap to clone; clones share the same immutable configuration. Concurrent
/// calls are independent and each derives its own IV.
#[derive(Debug, Clone)]
pub struct Encryptor {
    state: Result<Arc<Core>, EncryptorError>,
    mac_policy: MacPolicy,
}

impl Encryptor {
    /// Build an encryptor drawing IV randomness from the OS CSPRNG.
    pub fn new(options: Options) -> Self {
        Self::with_random_source(options, Arc::new(OsRandom))
    }

    /// Build an encryptor drawing IV randomness from `random`.
    pub fn with_random_source(options: Options, random: Arc<dyn RandomSource>) -> Self {
        let state = Core::new(&options, random).map(Arc::new);
        if let Err(e) = &state {
            warn!(error = %e, "encryptor configuration rejected; every call will fail");
        }
        Self {
            state,
            mac_policy: options.mac_policy,
        }
    }

    /// The held configuration error, if any.
    pub fn configuration_error(&self) -> Option<&EncryptorError> {
        self.state.as_ref().err()
    }

    pub fn algorithm(&self) -> Result<Algorithm, EncryptorError> {
        self.core().map(Core::algorithm)
    }

    /// Serialize `data` and encrypt it.
    pub async fn encrypt(&self, data: &Value) -> Result<String, EncryptorError> {
        self.encrypt_with(data, true).await
    }

    /// Encrypt `data`, serializing it first when `serialize` is set.
    ///
    /// With `serialize` off, strings are encrypted as is and numbers or
    /// booleans as their text form.
    ///
    /// # Errors
    ///
    /// Returns the held configuration error, a serialization error, or a
    /// cipher error (including random source failures).
    pub async fn encrypt_with(&self, data: &Value, serialize: bool) -> Result<String, EncryptorError> {
        let core = self.core()?;
        let plaintext = if serialize {
            core.serializer().serialize(data)?
        } else {
            plain_text(data)?
        };
        let iv = core.ivs().derive_async(core.random()).await?;
        core.seal(&iv, &plaintext)
    }

    /// Decrypt a payload and unserialize the result.
    pub async fn decrypt(&self, payload: &str) -> Result<Value, EncryptorError> {
        self.decrypt_with(payload, true).await
    }

    /// Decrypt a payload, unserializing the text when `unserialize` is set.
    ///
    /// The MAC is checked first under [`MacPolicy::Verify`] and skipped under
    /// [`MacPolicy::Skip`]. The IV length is never checked up front: a wrong
    /// length surfaces as a cipher error.
    pub async fn decrypt_with(&self, payload: &str, unserialize: bool) -> Result<Value, EncryptorError> {
        let core = self.core()?;
        let checks = match self.mac_policy {
            MacPolicy::Verify => Checks::MAC_ONLY,
            MacPolicy::Skip => Checks::NONE,
        };
        core.open(payload, checks, DecodePolicy::Explicit(unserialize))
    }

    /// Generate a base64 key of `len` random bytes. Needs no instance.
    pub async fn generate_key(len: usize) -> Result<String, EncryptorError> {
        Ok(random::generate_key(len).await?)
    }

    fn core(&self) -> Result<&Core, EncryptorError> {
        self.state.as_deref().map_err(Clone::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::random::MockRandomSource;
    use crate::crypto::RandomError;
    use serde_json::json;

    const KEY: &str = "LQUcxdgHIEiBAixaJ8BInmXRHdKLOacDXMEBLU0Ci/o=";

    #[tokio::test]
    async fn text_round_trip() {
        let enc = Encryptor::new(Options::new(KEY));
        let payload = enc.encrypt(&json!("resistance is futile")).await.unwrap();
        assert_eq!(
            enc.decrypt(&payload).await.unwrap(),
            json!("resistance is futile")
        );
    }

    #[tokio::test]
    async fn configuration_error_surfaces_on_first_call() {
        let enc = Encryptor::new(Options::new(KEY).with_key_length(100));
        assert!(enc.configuration_error().is_some());
        assert!(matches!(
            enc.encrypt(&json!("x")).await,
            Err(EncryptorError::Configuration(_))
        ));
        assert!(matches!(
            enc.decrypt("anything").await,
            Err(EncryptorError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn random_source_failure_is_cipher_error() {
        let mut mock = MockRandomSource::new();
        mock.expect_fill()
            .returning(|_| Err(RandomError::Source("exhausted".into())));
        let enc = Encryptor::with_random_source(Options::new(KEY), Arc::new(mock));
        assert!(matches!(
            enc.encrypt(&json!("x")).await,
            Err(EncryptorError::Cipher(_))
        ));
    }

    #[tokio::test]
    async fn raw_mode_keeps_text() {
        let enc = Encryptor::new(Options::new(KEY));
        let payload = enc.encrypt_with(&json!(1), false).await.unwrap();
        assert_eq!(enc.decrypt_with(&payload, false).await.unwrap(), json!("1"));
    }

    #[tokio::test]
    async fn raw_mode_rejects_structures() {
        let enc = Encryptor::new(Options::new(KEY));
        assert!(matches!(
            enc.encrypt_with(&json!({"foo": "bar"}), false).await,
            Err(EncryptorError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn unserializing_plain_text_fails() {
        let enc = Encryptor::new(Options::new(KEY));
        let payload = enc.encrypt_with(&json!("plain"), false).await.unwrap();
        assert!(matches!(
            enc.decrypt(&payload).await,
            Err(EncryptorError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn generate_key_is_base64() {
        let key = Encryptor::generate_key(32).await.unwrap();
        assert_eq!(key.len(), 44);
        assert!(Encryptor::new(Options::new(key)).configuration_error().is_none());
    }
}
