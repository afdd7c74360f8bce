//! Command implementations. Each returns the text to print on stdout.

use anyhow::{Context, Result};
use laravel_encryptor::{Encryptor, Options, SyncEncryptor};
use serde_json::Value;
use tracing::info;

use crate::cli::{Commands, DecryptArgs, EncryptArgs, GenerateKeyArgs};
use crate::config::Config;

pub async fn run(command: Commands, cfg: &Config) -> Result<String> {
    match command {
        Commands::Encrypt(args) => encrypt(args, cfg.encryptor_options()?).await,
        Commands::Decrypt(args) => decrypt(args, cfg.encryptor_options()?).await,
        Commands::GenerateKey(args) => generate_key(args).await,
    }
}

async fn encrypt(args: EncryptArgs, options: Options) -> Result<String> {
    let value = if args.json {
        serde_json::from_str(&args.value).context("VALUE is not valid JSON")?
    } else {
        Value::String(args.value)
    };

    let payload = if args.sync {
        SyncEncryptor::new(options)?.encrypt(&value)?
    } else {
        Encryptor::new(options)
            .encrypt_with(&value, !args.raw)
            .await?
    };
    info!(sync = args.sync, "value encrypted");
    Ok(payload)
}

async fn decrypt(args: DecryptArgs, options: Options) -> Result<String> {
    let value = if args.sync {
        SyncEncryptor::new(options)?.decrypt(&args.payload)?
    } else {
        Encryptor::new(options)
            .decrypt_with(&args.payload, !args.raw)
            .await?
    };
    info!(sync = args.sync, "payload decrypted");
    render(&value)
}

async fn generate_key(args: GenerateKeyArgs) -> Result<String> {
    Ok(Encryptor::generate_key(args.bytes).await?)
}

/// Strings print verbatim; anything else prints as JSON.
fn render(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => serde_json::to_string(other).context("failed to render decrypted value"),
    }
}
