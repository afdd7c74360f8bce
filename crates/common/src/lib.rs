//! Error kinds and wire protocol types shared across `laravel-encryptor` crates.

pub mod error;
pub mod protocol;

pub use error::EncryptorError;
pub use protocol::Envelope;
