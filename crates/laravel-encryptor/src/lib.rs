//! Laravel-compatible payload encryption.
//!
//! Produces and consumes the `base64(json({iv, value, mac}))` payloads that
//! Laravel's `Crypt` facade exchanges, so data encrypted here can be
//! decrypted there and the other way round.
//!
//! Two façades share one pipeline:
//!
//! - [`Encryptor`]: async, reports every failure (configuration included)
//!   through the returned future, explicit serialize/unserialize flags.
//! - [`SyncEncryptor`]: blocking, fails construction on bad configuration,
//!   validates and authenticates payloads before deciphering, auto-detects
//!   serialized plaintext.
//!
//! ```no_run
//! use laravel_encryptor::{Options, SyncEncryptor};
//! use serde_json::json;
//!
//! let enc = SyncEncryptor::new(Options::new("LQUcxdgHIEiBAixaJ8BInmXRHdKLOacDXMEBLU0Ci/o="))?;
//! let payload = enc.encrypt(&json!({"foo": "bar"}))?;
//! assert_eq!(enc.decrypt(&payload)?, json!({"foo": "bar"}));
//! # Ok::<(), laravel_encryptor::EncryptorError>(())
//! ```

pub mod crypto;
pub mod encryptor;
pub mod envelope;
pub mod error;
pub mod options;
pub mod serialize;

pub use common::{EncryptorError, Envelope};
pub use crypto::random::{generate_key, generate_random_key, DEFAULT_KEY_BYTES};
pub use crypto::{Algorithm, OsRandom, RandomError, RandomSource};
pub use encryptor::{Encryptor, SyncEncryptor};
pub use options::{MacPolicy, Options};
pub use serialize::{JsonSerializer, PhpSerializer, SerializeMode, Serializer};
