//! [`KeyCache`]: compute-once cell for the derived encryption key.

use std::time::Instant;

use common::VaultError;
use once_cell::sync::OnceCell;
use tracing::info;

use crate::crypto::{derive_key, DerivedKey, KdfParams, Secret};

/// Holds the root secret and lazily derives the key from it exactly once.
///
/// Concurrent first callers block on the same derivation rather than racing
/// their own; later callers get the cached key without locking. A failed
/// derivation is not cached.
pub struct KeyCache {
    secret: Secret,
    params: KdfParams,
    key: OnceCell<DerivedKey>,
}

impl KeyCache {
    /// Create an empty cache for `secret`.
    pub fn new(secret: Secret, params: KdfParams) -> Self {
        Self {
            secret,
            params,
            key: OnceCell::new(),
        }
    }

    /// Returns `true` once the key has been derived.
    pub fn is_ready(&self) -> bool {
        self.key.get().is_some()
    }

    /// Borrow the derived key, deriving it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Configuration`] if the KDF parameters are invalid.
    pub fn get(&self) -> Result<&DerivedKey, VaultError> {
        self.key.get_or_try_init(|| {
            let started = Instant::now();
            let key = derive_key(&self.secret, &self.params)?;
            info!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                log_n = self.params.log_n,
                r = self.params.r,
                p = self.params.p,
                "encryption key derived"
            );
            Ok(key)
        })
    }
}

impl std::fmt::Debug for KeyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyCache")
            .field("params", &self.params)
            .field("ready", &self.is_ready())
            .finish()
    }
}
