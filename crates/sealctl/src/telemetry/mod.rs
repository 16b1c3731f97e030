//! Logging for `sealctl`.
//!
//! `seal`, `open` and `migrate` print values on stdout that callers pipe
//! straight into a database or another command, one value per line. Log
//! records therefore go to stderr as JSON, and never onto stdout where they
//! would be read back as a stored token.

use anyhow::Result;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Install the process-wide JSON subscriber on stderr.
///
/// `RUST_LOG` overrides `log_level` (from `LOG_LEVEL`) when set.
///
/// # Errors
///
/// Returns an error if the subscriber has already been set.
pub fn init(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing::subscriber::set_global_default(json_subscriber(filter, std::io::stderr))
        .map_err(|e| anyhow::anyhow!("failed to install sealctl log subscriber: {e}"))
}

fn json_subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(writer)
        .finish()
}
