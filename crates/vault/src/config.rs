//! Configuration loading and validation.
//!
//! All values are read from environment variables. [`VaultConfig::from_env`] is
//! the only place this crate touches the environment; everything else takes a
//! [`VaultConfig`] or a [`Secret`] explicitly.

use std::fmt;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::crypto::{KdfParams, Secret};

/// Validated vault configuration.
#[derive(Clone, Deserialize)]
pub struct VaultConfig {
    /// Root secret every key is derived from. **Required.**
    #[serde(default)]
    pub encryption_secret: String,

    /// log2 of the scrypt cost `N`.
    #[serde(default = "default_scrypt_log_n")]
    pub scrypt_log_n: u8,

    /// scrypt block size.
    #[serde(default = "default_scrypt_r")]
    pub scrypt_r: u32,

    /// scrypt parallelism.
    #[serde(default = "default_scrypt_p")]
    pub scrypt_p: u32,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_scrypt_log_n() -> u8 {
    KdfParams::default().log_n
}
fn default_scrypt_r() -> u32 {
    KdfParams::default().r
}
fn default_scrypt_p() -> u32 {
    KdfParams::default().p
}
fn default_log_level() -> String {
    "info".into()
}

impl VaultConfig {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `ENCRYPTION_SECRET` is absent or blank, or if any
    /// value cannot be parsed or is out of range.
    pub fn from_env() -> Result<Self> {
        Self::from_source(config::Environment::default())
    }

    /// Load and validate configuration from an explicit environment source.
    pub fn from_source(source: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(source)
            .build()
            .context("failed to build configuration from environment")?;

        let c: VaultConfig = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// scrypt cost parameters selected by this configuration.
    pub fn kdf_params(&self) -> KdfParams {
        KdfParams {
            log_n: self.scrypt_log_n,
            r: self.scrypt_r,
            p: self.scrypt_p,
        }
    }

    /// Wrap the configured secret.
    pub fn secret(&self) -> Result<Secret, common::VaultError> {
        Secret::new(&self.encryption_secret)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.encryption_secret.trim().is_empty() {
            anyhow::bail!("ENCRYPTION_SECRET is required and must not be empty");
        }
        self.kdf_params()
            .validate()
            .context("SCRYPT_LOG_N / SCRYPT_R / SCRYPT_P are out of range")?;
        Ok(())
    }
}

impl fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultConfig")
            .field("encryption_secret", &"[REDACTED]")
            .field("scrypt_log_n", &self.scrypt_log_n)
            .field("scrypt_r", &self.scrypt_r)
            .field("scrypt_p", &self.scrypt_p)
            .field("log_level", &self.log_level)
            .finish()
    }
}
