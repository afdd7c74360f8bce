//! `encryptor` command-line entry point.
//!
//! Startup sequence:
//! 1. Parse arguments.
//! 2. Load [`Config`] from environment variables.
//! 3. Initialise structured JSON logging on stderr.
//! 4. Run the command, printing its result on stdout or a JSON error on stderr.

mod cli;
mod commands;
mod config;
mod telemetry;

use std::process::ExitCode;

use clap::Parser;
use common::{protocol::ErrorResponse, EncryptorError};
use tracing::warn;

use config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    // -----------------------------------------------------------------------
    // 1. Arguments
    // -----------------------------------------------------------------------
    let cli = cli::Cli::parse();

    // -----------------------------------------------------------------------
    // 2. Configuration
    // -----------------------------------------------------------------------
    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            // Telemetry is not yet up; write to stderr directly.
            eprintln!("ERROR: encryptor configuration invalid: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    // -----------------------------------------------------------------------
    // 3. Telemetry
    // -----------------------------------------------------------------------
    if let Err(e) = telemetry::init(&cfg.log_level) {
        eprintln!("ERROR: {e:#}");
        return ExitCode::FAILURE;
    }

    // -----------------------------------------------------------------------
    // 4. Command
    // -----------------------------------------------------------------------
    match commands::run(cli.command, &cfg).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            let response = match e.downcast_ref::<EncryptorError>() {
                Some(kind) => ErrorResponse::from(kind),
                None => ErrorResponse::new("cli_error", format!("{e:#}")),
            };
            warn!(code = %response.code, "command failed");
            match serde_json::to_string(&response) {
                Ok(body) => eprintln!("{body}"),
                Err(_) => eprintln!("ERROR: {}", response.message),
            }
            ExitCode::FAILURE
        }
    }
}
