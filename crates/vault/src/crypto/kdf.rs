//! Key derivation: root [`Secret`] → 32-byte AES-256 key via two scrypt passes.
//!
//! ```text
//! salt = scrypt(secret, DERIVATION_CONTEXT, 32)
//! key  = scrypt(secret, salt, 32)
//! ```
//!
//! The first pass replaces a separately stored salt. Changing
//! [`DERIVATION_CONTEXT`] or the default [`KdfParams`] changes every key and
//! requires re-encrypting all stored envelopes.

use std::fmt;

use common::VaultError;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::secret::Secret;

/// Fixed, non-secret label fed to the first scrypt pass.
pub const DERIVATION_CONTEXT: &[u8] = b"plaid-token-salt";

/// Byte length of the intermediate salt.
pub const SALT_LEN: usize = 32;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// scrypt cost parameters, applied to both passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// log2 of the CPU/memory cost `N`.
    pub log_n: u8,
    /// Block size.
    pub r: u32,
    /// Parallelism.
    pub p: u32,
}

impl Default for KdfParams {
    /// N = 16384, r = 8, p = 1.
    fn default() -> Self {
        Self {
            log_n: 14,
            r: 8,
            p: 1,
        }
    }
}

impl KdfParams {
    /// Check the parameters against the limits scrypt enforces.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Configuration`] if scrypt rejects the combination.
    pub fn validate(&self) -> Result<(), VaultError> {
        self.to_scrypt(KEY_LEN).map(|_| ())
    }

    fn to_scrypt(self, len: usize) -> Result<scrypt::Params, VaultError> {
        scrypt::Params::new(self.log_n, self.r, self.p, len).map_err(|e| {
            VaultError::Configuration(format!(
                "invalid scrypt parameters (log_n={}, r={}, p={}): {e}",
                self.log_n, self.r, self.p
            ))
        })
    }
}

/// A derived AES-256 key. Wiped on drop; never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_LEN]);

impl DerivedKey {
    /// Wrap key material obtained elsewhere (tests, externally managed keys).
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derive the AES-256 key for `secret`.
///
/// Deterministic and free of I/O; cost is dominated by the two scrypt passes.
///
/// # Errors
///
/// Returns [`VaultError::Configuration`] if `params` are rejected by scrypt.
pub fn derive_key(secret: &Secret, params: &KdfParams) -> Result<DerivedKey, VaultError> {
    let mut salt = Zeroizing::new([0u8; SALT_LEN]);
    run_scrypt(secret.expose(), DERIVATION_CONTEXT, params, &mut salt[..])?;

    let mut key = DerivedKey([0u8; KEY_LEN]);
    run_scrypt(secret.expose(), &salt[..], params, &mut key.0)?;
    Ok(key)
}

fn run_scrypt(
    password: &[u8],
    salt: &[u8],
    params: &KdfParams,
    output: &mut [u8],
) -> Result<(), VaultError> {
    let scrypt_params = params.to_scrypt(output.len())?;
    scrypt::scrypt(password, salt, &scrypt_params, output)
        .map_err(|e| VaultError::Configuration(format!("scrypt output length rejected: {e}")))
}
