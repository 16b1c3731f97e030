//! `token-vault`: authenticated encryption for third-party access tokens at rest.
//!
//! A stored value is an *envelope*: `base64(nonce[16] ‖ tag[16] ‖ ciphertext)`,
//! sealed with AES-256-GCM under a key derived from one root secret by two
//! scrypt passes. Envelopes are opaque text, safe for a plain database column
//! or a JSON field.
//!
//! ```no_run
//! use token_vault::{Secret, Vault};
//!
//! let vault = Vault::new(Secret::new("root-secret")?);
//! let stored = vault.encrypt("access-sandbox-123")?;
//! assert_eq!(vault.decrypt(&stored)?, "access-sandbox-123");
//! # Ok::<(), token_vault::VaultError>(())
//! ```
//!
//! Prefer a long-lived [`Vault`]: it derives the key once. The free functions
//! [`encrypt`] and [`decrypt`] derive it on every call.

pub mod config;
pub mod crypto;
pub mod key;
pub mod migrate;
pub mod vault;

pub use common::{looks_encrypted, Envelope, ErrorKind, VaultError};
pub use config::VaultConfig;
pub use crypto::{DerivedKey, KdfParams, Secret};
pub use migrate::StoredToken;
pub use vault::Vault;

/// Seal `plaintext` under `secret` with the default scrypt cost.
///
/// # Errors
///
/// Returns [`VaultError::Configuration`] if `secret` is empty.
pub fn encrypt(plaintext: &str, secret: impl AsRef<[u8]>) -> Result<String, VaultError> {
    Vault::new(Secret::new(secret)?).encrypt(plaintext)
}

/// Open `envelope` under `secret` with the default scrypt cost.
///
/// The envelope is checked before the secret, so a malformed value is
/// reported as [`VaultError::Format`] even when no secret is configured.
///
/// # Errors
///
/// [`VaultError::Format`], [`VaultError::Configuration`] or
/// [`VaultError::Integrity`]; see [`Vault::decrypt`].
pub fn decrypt(envelope: &str, secret: impl AsRef<[u8]>) -> Result<String, VaultError> {
    // Base64 only, so cheap next to the scrypt derivation that follows.
    if let Err(malformed) = Envelope::decode(envelope) {
        if Envelope::decode_bare(envelope).is_none() {
            return Err(malformed);
        }
    }
    Vault::new(Secret::new(secret)?).decrypt(envelope)
}
