//! Key-size selector resolution.
//!
//! The selector counts key length in hex characters, so `32` selects
//! AES-128-CBC and `64` selects AES-256-CBC. The resolver never looks at the
//! secret itself; a secret of the wrong size is rejected later by the cipher.

use std::fmt;

use common::EncryptorError;

/// Message reported for any unrecognised key-size selector.
pub const UNSUPPORTED_CIPHER: &str =
    "The only supported ciphers are AES-128-CBC and AES-256-CBC with the correct key lengths.";

/// Selector value for AES-128-CBC.
pub const SELECTOR_AES_128: u32 = 32;

/// Selector value for AES-256-CBC.
pub const SELECTOR_AES_256: u32 = 64;

/// The cipher used for a codec instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    Aes128Cbc,
    #[default]
    Aes256Cbc,
}

impl Algorithm {
    /// Resolve an optional key-size selector into an algorithm.
    ///
    /// # Errors
    ///
    /// Returns [`EncryptorError::Configuration`] if `selector` is present and
    /// is neither [`SELECTOR_AES_128`] nor [`SELECTOR_AES_256`].
    pub fn resolve(selector: Option<u32>) -> Result<Self, EncryptorError> {
        match selector {
            None => Ok(Self::default()),
            Some(SELECTOR_AES_128) => Ok(Self::Aes128Cbc),
            Some(SELECTOR_AES_256) => Ok(Self::Aes256Cbc),
            Some(_) => Err(EncryptorError::Configuration(UNSUPPORTED_CIPHER.into())),
        }
    }

    pub fn key_bits(self) -> usize {
        match self {
            Self::Aes128Cbc => 128,
            Self::Aes256Cbc => 256,
        }
    }

    /// Key length in bytes this algorithm requires.
    pub fn key_len(self) -> usize {
        self.key_bits() / 8
    }

    /// Conventional lowercase identifier, e.g. `"aes-256-cbc"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Aes128Cbc => "aes-128-cbc",
            Self::Aes256Cbc => "aes-256-cbc",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
