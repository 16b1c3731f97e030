//! Command-line surface.

use clap::{Parser, Subcommand};

/// Seal, open and classify stored access tokens.
///
/// The root secret is read from `ENCRYPTION_SECRET`. Values are taken from the
/// command line or, when omitted, from one line of stdin (preferred, so
/// credentials stay out of the process list).
#[derive(Debug, Parser)]
#[command(name = "sealctl", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Seal a plaintext value and print the envelope.
    Seal {
        /// Plaintext to seal. Read from stdin when omitted.
        value: Option<String>,
    },
    /// Open an envelope and print the plaintext.
    Open {
        /// Envelope to open. Read from stdin when omitted.
        value: Option<String>,
    },
    /// Print `envelope` or `plaintext` for a stored value, without decrypting.
    Check {
        /// Stored value to classify. Read from stdin when omitted.
        value: Option<String>,
    },
    /// Read stored values line by line from stdin and write the migrated
    /// value for each: legacy plaintext is sealed, envelopes are verified and
    /// passed through unchanged.
    Migrate,
}
