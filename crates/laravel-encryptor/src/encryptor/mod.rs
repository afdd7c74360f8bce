//! The encrypt/decrypt pipeline and its two façades.
//!
//! [`Core`] holds the resolved configuration and runs every synchronous step:
//! cipher, MAC, envelope and decode policy. The façades differ only in how
//! they obtain an IV, which checks they run before deciphering, and how
//! failures reach the caller:
//!
//! - [`Encryptor`] (async): configuration errors are held until the first
//!   call, IV randomness is gathered off the runtime, the caller chooses
//!   whether to (un)serialize.
//! - [`SyncEncryptor`]: configuration errors fail construction, payloads are
//!   structurally validated and authenticated before deciphering, and
//!   decrypted text is unserialized only when it looks serialized.

pub mod blocking;
pub mod deferred;

pub use blocking::SyncEncryptor;
pub use deferred::Encryptor;

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::crypto::{cipher, mac, Algorithm, IvDeriver, RandomSource, SecretKey};
use crate::envelope;
use crate::error::EncryptorError;
use crate::options::Options;
use crate::serialize::{DecodePolicy, Serializer};

/// Checks applied to a payload before it reaches the cipher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Checks {
    /// IV must decode to exactly one block.
    pub structure: bool,
    pub mac: bool,
}

impl Checks {
    pub const STRICT: Checks = Checks {
        structure: true,
        mac: true,
    };
    pub const MAC_ONLY: Checks = Checks {
        structure: false,
        mac: true,
    };
    pub const NONE: Checks = Checks {
        structure: false,
        mac: false,
    };
}

/// Resolved, immutable state shared by every call on an encryptor.
pub(crate) struct Core {
    secret: SecretKey,
    algorithm: Algorithm,
    ivs: IvDeriver,
    serializer: Arc<dyn Serializer>,
    random: Arc<dyn RandomSource>,
}

impl Core {
    pub fn new(options: &Options, random: Arc<dyn RandomSource>) -> Result<Self, EncryptorError> {
        let algorithm = options.algorithm()?;
        let secret = options.secret()?;
        Ok(Self {
            secret,
            algorithm,
            ivs: IvDeriver::new(options.random_bytes),
            serializer: options.serialize_mode.serializer(),
            random,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn ivs(&self) -> IvDeriver {
        self.ivs
    }

    pub fn serializer(&self) -> &dyn Serializer {
        self.serializer.as_ref()
    }

    pub fn random(&self) -> Arc<dyn RandomSource> {
        Arc::clone(&self.random)
    }

    /// Encrypt `plaintext` under `iv` and return the outer-encoded envelope.
    pub fn seal(&self, iv: &[u8], plaintext: &str) -> Result<String, EncryptorError> {
        let key = self.secret.as_bytes();
        let ciphertext = cipher::encrypt(self.algorithm, key, iv, plaintext.as_bytes())?;
        let envelope = envelope::encode(key, iv, &ciphertext)?;
        debug!(
            algorithm = %self.algorithm,
            ciphertext_len = ciphertext.len(),
            "payload sealed"
        );
        envelope::serialize_outer(&envelope)
    }

    /// Decode, check, decipher and apply `policy` to an outer payload.
    ///
    /// Steps run strictly in order: decode, structure check, MAC check,
    /// decipher, decode policy. The first failure ends the call.
    pub fn open(
        &self,
        payload: &str,
        checks: Checks,
        policy: DecodePolicy,
    ) -> Result<Value, EncryptorError> {
        let decoded = if checks.structure {
            envelope::parse_outer(payload)
        } else {
            envelope::decode_outer(payload)
        };
        let envelope = decoded.map_err(|e| {
            warn!(error = %e, "rejected malformed payload");
            e
        })?;

        let key = self.secret.as_bytes();
        if checks.mac && !mac::verify(key, &envelope.iv, &envelope.value, &envelope.mac) {
            warn!("rejected payload with invalid MAC");
            return Err(EncryptorError::Authentication);
        }

        let iv = envelope::iv_bytes(&envelope)?;
        let ciphertext = envelope::ciphertext_bytes(&envelope)?;
        let plaintext = cipher::decrypt(self.algorithm, key, &iv, &ciphertext)?;
        debug!(algorithm = %self.algorithm, ?policy, "payload opened");

        let text = String::from_utf8_lossy(&plaintext).into_owned();
        Ok(policy.apply(self.serializer(), text)?)
    }
}

impl std::fmt::Debug for Core {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Core")
            .field("secret", &self.secret)
            .field("algorithm", &self.algorithm)
            .field("ivs", &self.ivs)
            .field("serializer", &self.serializer)
            .finish_non_exhaustive()
    }
}

/// Text to encrypt when the caller turned serialization off.
///
/// Strings pass through; numbers and booleans use their display form.
/// Structured values and `null` cannot be encrypted without serializing.
pub(crate) fn plain_text(data: &Value) -> Result<String, EncryptorError> {
    match data {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => Err(EncryptorError::Serialization(
            "structured values must be serialized before encryption".into(),
        )),
    }
}

/// Normalise input for the blocking façade.
///
/// Arrays and objects always go through the serializer; scalars are
/// stringified. Empty input (`null`, `false`, `0`, `""`) is rejected.
pub(crate) fn prepare_data(
    serializer: &dyn Serializer,
    data: &Value,
) -> Result<String, EncryptorError> {
    if is_empty_input(data) {
        return Err(EncryptorError::MissingData);
    }
    match data {
        Value::Array(_) | Value::Object(_) => Ok(serializer.serialize(data)?),
        scalar => plain_text(scalar),
    }
}

fn is_empty_input(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::OsRandom;
    use crate::serialize::PhpSerializer;
    use serde_json::json;

    const KEY: &str = "LQUcxdgHIEiBAixaJ8BInmXRHdKLOacDXMEBLU0Ci/o=";

    fn core() -> Core {
        Core::new(&Options::new(KEY), Arc::new(OsRandom)).unwrap()
    }

    #[test]
    fn seal_then_open_strict() {
        let core = core();
        let payload = core.seal(b"0001020304050607", "hello").unwrap();
        let value = core
            .open(&payload, Checks::STRICT, DecodePolicy::Explicit(false))
            .unwrap();
        assert_eq!(value, json!("hello"));
    }

    #[test]
    fn checks_none_skips_mac() {
        let core = core();
        let payload = core.seal(b"0001020304050607", "hello").unwrap();
        let mut env = envelope::decode_outer(&payload).unwrap();
        env.mac = "0".repeat(64);
        let tampered = envelope::serialize_outer(&env).unwrap();

        assert_eq!(
            core.open(&tampered, Checks::STRICT, DecodePolicy::Explicit(false)),
            Err(EncryptorError::Authentication)
        );
        assert_eq!(
            core.open(&tampered, Checks::NONE, DecodePolicy::Explicit(false))
                .unwrap(),
            json!("hello")
        );
    }

    #[test]
    fn plain_text_stringifies_scalars() {
        assert_eq!(plain_text(&json!("a")).unwrap(), "a");
        assert_eq!(plain_text(&json!(1)).unwrap(), "1");
        assert_eq!(plain_text(&json!(2.5)).unwrap(), "2.5");
        assert_eq!(plain_text(&json!(true)).unwrap(), "true");
        assert!(plain_text(&json!({"a": 1})).is_err());
    }

    #[test]
    fn prepare_data_serializes_structures_only() {
        let php = PhpSerializer;
        assert_eq!(
            prepare_data(&php, &json!({"foo": "bar"})).unwrap(),
            r#"a:1:{s:3:"foo";s:3:"bar";}"#
        );
        assert_eq!(prepare_data(&php, &json!("text")).unwrap(), "text");
        assert_eq!(prepare_data(&php, &json!(1)).unwrap(), "1");
    }

    #[test]
    fn prepare_data_rejects_empty_input() {
        let php = PhpSerializer;
        for empty in [json!(null), json!(false), json!(0), json!(""), json!(0.0)] {
            assert_eq!(
                prepare_data(&php, &empty),
                Err(EncryptorError::MissingData),
                "{empty}"
            );
        }
    }

    #[test]
    fn debug_never_shows_key() {
        let shown = format!("{:?}", core());
        assert!(shown.contains("REDACTED"));
    }
}
