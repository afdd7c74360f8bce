//! [`SyncEncryptor`]: the blocking façade with up-front payload validation.

use std::sync::Arc;

use serde_json::Value;

use super::{prepare_data, Checks, Core};
use crate::crypto::{random, Algorithm, OsRandom, RandomSource};
use crate::error::EncryptorError;
use crate::options::Options;
use crate::serialize::DecodePolicy;

/// Blocking Laravel-compatible encryptor.
///
/// Decryption validates the payload shape and MAC before touching the
/// cipher, and unserializes the result only when it recognises serialized
/// text.
#[derive(Debug, Clone)]
pub struct SyncEncryptor {
    core: Arc<Core>,
}

impl SyncEncryptor {
    /// Build an encryptor drawing IV randomness from the OS CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns [`EncryptorError::Configuration`] for an unknown key-size
    /// selector or a missing or undecodable key.
    pub fn new(options: Options) -> Result<Self, EncryptorError> {
        Self::with_random_source(options, Arc::new(OsRandom))
    }

    pub fn with_random_source(
        options: Options,
        random: Arc<dyn RandomSource>,
    ) -> Result<Self, EncryptorError> {
        Ok(Self {
            core: Arc::new(Core::new(&options, random)?),
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.core.algorithm()
    }

    /// Encrypt `data`.
    ///
    /// Arrays and objects are serialized; strings, numbers and booleans are
    /// encrypted as text.
    ///
    /// # Errors
    ///
    /// Returns [`EncryptorError::MissingData`] for empty input, otherwise a
    /// serialization or cipher error.
    pub fn encrypt(&self, data: &Value) -> Result<String, EncryptorError> {
        let plaintext = prepare_data(self.core.serializer(), data)?;
        let random = self.core.random();
        let iv = self.core.ivs().derive(random.as_ref())?;
        self.core.seal(&iv, &plaintext)
    }

    /// Decrypt a payload.
    ///
    /// Runs, in order: outer decode ([`EncryptorError::PayloadFormat`]),
    /// structure check ([`EncryptorError::PayloadFormat`]), MAC check
    /// ([`EncryptorError::Authentication`]), decipher
    /// ([`EncryptorError::Cipher`]), then auto-detected unserialize.
    pub fn decrypt(&self, payload: &str) -> Result<Value, EncryptorError> {
        self.core
            .open(payload, Checks::STRICT, DecodePolicy::AutoDetect)
    }

    /// Generate a base64 key of `len` random bytes. Needs no instance.
    pub fn generate_random_key(len: usize) -> Result<String, EncryptorError> {
        Ok(random::generate_random_key(len)?)
    }
}
