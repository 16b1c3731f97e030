//! `sealctl`: operator tool over `token-vault`.
//!
//! Startup sequence:
//! 1. Parse the command line.
//! 2. Load and validate [`VaultConfig`] from environment variables.
//! 3. Initialise structured JSON logging.
//! 4. Build the [`Vault`] and run the command.

mod cli;
mod commands;
mod telemetry;

use std::io;

use anyhow::Result;
use clap::Parser;
use token_vault::{Vault, VaultConfig};
use tracing::debug;

use cli::Cli;

fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Command line
    // -----------------------------------------------------------------------
    let cli = Cli::parse();

    // -----------------------------------------------------------------------
    // 2. Configuration
    // -----------------------------------------------------------------------
    let cfg = VaultConfig::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: sealctl configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 3. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;
    debug!(version = env!("CARGO_PKG_VERSION"), "sealctl starting");

    // -----------------------------------------------------------------------
    // 4. Command
    // -----------------------------------------------------------------------
    let vault = Vault::from_config(&cfg)?;
    commands::run(cli.command, &vault, io::stdin().lock(), io::stdout().lock())
}
