//! Logging for the `encryptor` binary.
//!
//! JSON lines on stderr, leaving stdout to the command result. `LOG_LEVEL`
//! applies to this binary and the codec library; other crates log at `warn`.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Targets that follow `LOG_LEVEL`.
const TARGETS: [&str; 2] = ["encryptor", "laravel_encryptor"];

/// Install the stderr JSON subscriber.
///
/// `RUST_LOG`, when set, replaces the filter built from `log_level`.
///
/// # Errors
///
/// Returns an error if `log_level` is not a valid level or a subscriber is
/// already installed.
pub fn init(log_level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(directives(log_level))
            .with_context(|| format!("invalid LOG_LEVEL {log_level:?}"))?,
    };

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install encryptor log subscriber: {e}"))
}

fn directives(log_level: &str) -> String {
    let level = log_level.trim().to_ascii_lowercase();
    TARGETS
        .iter()
        .fold(String::from("warn"), |acc, target| format!("{acc},{target}={level}"))
}
