use clap::{Args, Parser, Subcommand};
use laravel_encryptor::DEFAULT_KEY_BYTES;

/// Encrypt and decrypt Laravel-compatible payloads
#[derive(Parser)]
#[command(name = "encryptor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt a value and print the payload
    Encrypt(EncryptArgs),
    /// Decrypt a payload and print the value
    Decrypt(DecryptArgs),
    /// Print a new random base64 key
    GenerateKey(GenerateKeyArgs),
}

/// Arguments for the `encrypt` command
#[derive(Args)]
pub struct EncryptArgs {
    /// Value to encrypt
    #[arg(value_name = "VALUE")]
    pub value: String,

    /// Parse VALUE as JSON instead of taking it as a string
    #[arg(long)]
    pub json: bool,

    /// Use the blocking encryptor
    #[arg(long)]
    pub sync: bool,

    /// Do not serialize the value (async encryptor only)
    #[arg(long, conflicts_with = "sync")]
    pub raw: bool,
}

/// Arguments for the `decrypt` command
#[derive(Args)]
pub struct DecryptArgs {
    /// Payload to decrypt
    #[arg(value_name = "PAYLOAD")]
    pub payload: String,

    /// Use the blocking encryptor (validates, auto-detects serialization)
    #[arg(long)]
    pub sync: bool,

    /// Do not unserialize the decrypted text (async encryptor only)
    #[arg(long, conflicts_with = "sync")]
    pub raw: bool,
}

/// Arguments for the `generate-key` command
#[derive(Args)]
pub struct GenerateKeyArgs {
    /// Number of random bytes
    #[arg(long, default_value_t = DEFAULT_KEY_BYTES)]
    pub bytes: usize,
}
