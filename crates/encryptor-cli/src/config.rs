//! Configuration loading and validation for the encryptor CLI.
//!
//! Encryptor options come from `ENCRYPTOR_*` environment variables
//! (`ENCRYPTOR_KEY`, `ENCRYPTOR_KEY_LENGTH`, `ENCRYPTOR_RANDOM_BYTES`,
//! `ENCRYPTOR_SERIALIZE_MODE`, `ENCRYPTOR_MAC_POLICY`). The log level comes
//! from `LOG_LEVEL`.

use anyhow::{Context, Result};
use laravel_encryptor::Options;
use serde::Deserialize;

/// Loaded CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Encryptor options. The key is validated only by commands that need it.
    pub options: Options,

    /// Tracing log level.
    pub log_level: String,
}

#[derive(Debug, Deserialize)]
struct Logging {
    #[serde(default = "default_log_level")]
    log_level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let options: Options = config::Config::builder()
            .add_source(config::Environment::with_prefix("ENCRYPTOR").try_parsing(true))
            .build()
            .context("failed to build encryptor configuration")?
            .try_deserialize()
            .context("failed to deserialise encryptor configuration")?;

        let logging: Logging = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build logging configuration")?
            .try_deserialize()
            .context("failed to deserialise logging configuration")?;

        Ok(Self {
            options,
            log_level: logging.log_level,
        })
    }

    /// Options for commands that encrypt or decrypt.
    ///
    /// # Errors
    ///
    /// Returns an error if neither `ENCRYPTOR_KEY` nor the deprecated
    /// `ENCRYPTOR_LARAVEL_KEY` is set.
    pub fn encryptor_options(&self) -> Result<Options> {
        self.validate()?;
        Ok(self.options.clone())
    }

    fn validate(&self) -> Result<()> {
        let has_legacy = self
            .options
            .laravel_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty());
        if self.options.key.trim().is_empty() && !has_legacy {
            anyhow::bail!("ENCRYPTOR_KEY is required and must not be empty");
        }
        Ok(())
    }
}
