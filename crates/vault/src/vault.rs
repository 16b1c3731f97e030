//! [`Vault`]: the handle callers seal and open stored tokens with.

use std::sync::Arc;

use common::{Envelope, VaultError};
use tracing::{debug, warn};

use crate::config::VaultConfig;
use crate::crypto::{cipher, KdfParams, Secret};
use crate::key::KeyCache;

/// Seals plaintext into envelopes and opens them again under one root secret.
///
/// Cheap to clone; clones share the cached key. Safe to use from any number of
/// threads at once: the only shared state is the compute-once key cell.
#[derive(Clone, Debug)]
pub struct Vault {
    keys: Arc<KeyCache>,
}

impl Vault {
    /// Create a vault with the default scrypt cost.
    pub fn new(secret: Secret) -> Self {
        Self::with_params(secret, KdfParams::default())
    }

    /// Create a vault with explicit scrypt cost parameters.
    pub fn with_params(secret: Secret, params: KdfParams) -> Self {
        Self {
            keys: Arc::new(KeyCache::new(secret, params)),
        }
    }

    /// Create a vault from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Configuration`] if the configured secret is empty.
    pub fn from_config(cfg: &VaultConfig) -> Result<Self, VaultError> {
        Ok(Self::with_params(cfg.secret()?, cfg.kdf_params()))
    }

    /// Derive the key now instead of on first use.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Configuration`] if the KDF parameters are invalid.
    pub fn warm_up(&self) -> Result<(), VaultError> {
        self.keys.get().map(|_| ())
    }

    /// Returns `true` once the key has been derived.
    pub fn is_ready(&self) -> bool {
        self.keys.is_ready()
    }

    /// Seal a text value.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, VaultError> {
        self.encrypt_bytes(plaintext.as_bytes())
    }

    /// Seal arbitrary bytes under a fresh random nonce.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Configuration`] if the key cannot be derived.
    pub fn encrypt_bytes(&self, plaintext: &[u8]) -> Result<String, VaultError> {
        let key = self.keys.get()?;
        let nonce = cipher::generate_nonce();
        let (ciphertext, tag) = cipher::seal(key, &nonce, plaintext)?;
        Ok(Envelope {
            nonce,
            tag,
            ciphertext,
        }
        .encode())
    }

    /// Open an envelope holding text.
    ///
    /// # Errors
    ///
    /// As [`Vault::decrypt_bytes`]; additionally [`VaultError::Format`] if the
    /// authenticated plaintext is not UTF-8.
    pub fn decrypt(&self, envelope: &str) -> Result<String, VaultError> {
        let plaintext = self.decrypt_bytes(envelope)?;
        String::from_utf8(plaintext).map_err(|_| {
            VaultError::Format("authenticated plaintext is not valid UTF-8".into())
        })
    }

    /// Open an envelope.
    ///
    /// # Errors
    ///
    /// - [`VaultError::Format`] if `envelope` is not a structurally valid envelope
    /// - [`VaultError::Configuration`] if the key cannot be derived
    /// - [`VaultError::Integrity`] if authentication fails (wrong secret or tampering)
    ///
    /// A value of exactly nonce and tag (an empty plaintext) that fails
    /// authentication is reported as [`VaultError::Format`], not
    /// [`VaultError::Integrity`]: it is below the minimum envelope length and is
    /// only accepted at all when it authenticates. Under a wrong secret,
    /// `decrypt(encrypt(""))` is therefore a format error.
    pub fn decrypt_bytes(&self, envelope: &str) -> Result<Vec<u8>, VaultError> {
        let result = match Envelope::decode(envelope) {
            Ok(parsed) => self.open(&parsed),
            Err(malformed) => match Envelope::decode_bare(envelope) {
                // An empty plaintext seals to a bare nonce and tag. One that
                // does not authenticate is still just malformed input.
                Some(bare) => self.open(&bare).map_err(|e| match e {
                    VaultError::Integrity => malformed,
                    other => other,
                }),
                None => Err(malformed),
            },
        };
        if let Err(e) = &result {
            log_open_failure(e);
        }
        result
    }

    pub(crate) fn open(&self, envelope: &Envelope) -> Result<Vec<u8>, VaultError> {
        let key = self.keys.get()?;
        cipher::open(key, &envelope.nonce, &envelope.ciphertext, &envelope.tag)
    }
}

fn log_open_failure(err: &VaultError) {
    match err {
        VaultError::Integrity => warn!(code = err.code(), "envelope failed authentication"),
        VaultError::Format(_) => debug!(code = err.code(), "value is not a valid envelope"),
        VaultError::Configuration(_) => warn!(code = err.code(), "cannot derive encryption key"),
    }
}
