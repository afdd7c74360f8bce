//! Serialization bridge: structured values to and from text before encryption.
//!
//! Laravel encrypts PHP `serialize()` output by default, so [`PhpSerializer`]
//! is the default bridge. [`JsonSerializer`] is available for peers that
//! exchange JSON instead. Structured values are [`serde_json::Value`]s.
//!
//! Two decode policies exist and are deliberately kept apart:
//! - [`DecodePolicy::Explicit`]: the caller says whether to unserialize.
//! - [`DecodePolicy::AutoDetect`]: unserialize when the decrypted text is
//!   recognised by [`Serializer::detect`], otherwise return it verbatim.

pub mod json;
pub mod php;

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub use json::JsonSerializer;
pub use php::PhpSerializer;

/// Errors produced by a serialization bridge.
#[derive(Debug, Error)]
pub enum SerializeError {
    /// The input is not well-formed serialized data.
    #[error("malformed serialized data at byte {offset}: {reason}")]
    Malformed { offset: usize, reason: String },

    /// The value cannot be represented in the target format.
    #[error("unsupported value: {0}")]
    Unsupported(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A foreign text serialization format.
pub trait Serializer: Send + Sync + std::fmt::Debug {
    /// Encode a structured value as text.
    fn serialize(&self, value: &Value) -> Result<String, SerializeError>;

    /// Decode text produced by [`Serializer::serialize`] (or a peer).
    fn unserialize(&self, data: &str) -> Result<Value, SerializeError>;

    /// Decode `data` if it is output of this format, in a single pass.
    fn detect(&self, data: &str) -> Option<Value> {
        self.unserialize(data).ok()
    }

    /// Whether `data` looks like output of this format.
    fn is_serialized(&self, data: &str) -> bool {
        self.detect(data).is_some()
    }
}

/// Which bridge an encryptor uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializeMode {
    #[default]
    Php,
    Json,
}

impl SerializeMode {
    pub fn serializer(self) -> Arc<dyn Serializer> {
        match self {
            SerializeMode::Php => Arc::new(PhpSerializer),
            SerializeMode::Json => Arc::new(JsonSerializer),
        }
    }
}

/// How decrypted text is turned back into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Unserialize when `true`, return the text as a string when `false`.
    Explicit(bool),
    /// Unserialize only when the text is recognised as serialized.
    AutoDetect,
}

impl DecodePolicy {
    /// Apply this policy to decrypted `text`.
    pub fn apply(self, serializer: &dyn Serializer, text: String) -> Result<Value, SerializeError> {
        match self {
            DecodePolicy::Explicit(true) => serializer.unserialize(&text),
            DecodePolicy::Explicit(false) => Ok(Value::String(text)),
            DecodePolicy::AutoDetect => Ok(match serializer.detect(&text) {
                Some(value) => value,
                None => Value::String(text),
            }),
        }
    }
}
