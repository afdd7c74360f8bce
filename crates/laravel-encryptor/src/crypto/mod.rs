//! AES-CBC + HMAC-SHA256 primitives behind the Laravel payload format.
//!
//! This module knows nothing about envelopes or serialization. It provides
//! the algorithm resolver, the cipher adapter, the IV derivation rule, the
//! MAC engine and the random sources the façades are built from.
//!
//! # Key material
//!
//! Secrets are held in [`SecretKey`], which is zeroized on drop and never
//! prints its bytes. No function in this module logs keys, IVs or plaintext.

pub mod algorithm;
pub mod cipher;
pub mod iv;
pub mod key;
pub mod mac;
pub mod random;

pub use algorithm::Algorithm;
pub use cipher::{CipherError, IV_LEN};
pub use iv::IvDeriver;
pub use key::SecretKey;
pub use mac::MacError;
pub use random::{OsRandom, RandomError, RandomSource};
