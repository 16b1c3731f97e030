//! Reading stored values that may predate encryption.
//!
//! Older records hold access tokens in plaintext. [`Vault::open_stored`] uses
//! the [`looks_encrypted`] heuristic to pick a path, and
//! [`Vault::reseal_if_legacy`] produces the replacement value for a record
//! that still needs migrating.
//!
//! An empty plaintext seals to a bare nonce and tag, which is below the
//! heuristic's threshold. Such a value is still recognised as sealed when it
//! authenticates under this vault.
//!
//! A legacy plaintext that happens to be base64 of 33 bytes or more is
//! classified as an envelope and fails to open with
//! [`VaultError::Integrity`]. Provider access tokens contain `-`, which is
//! outside the standard base64 alphabet, so they are never misclassified.

use common::{looks_encrypted, Envelope, VaultError};
use tracing::debug;

use crate::vault::Vault;

/// A stored value after it has been read back.
#[derive(Clone, PartialEq, Eq)]
pub enum StoredToken {
    /// The value was an envelope and opened successfully.
    Sealed(String),
    /// The value was plaintext written before encryption was introduced.
    Legacy(String),
}

impl StoredToken {
    /// Returns `true` if the record still needs migrating.
    pub fn is_legacy(&self) -> bool {
        matches!(self, StoredToken::Legacy(_))
    }

    /// The usable plaintext, whichever way it was stored.
    pub fn into_plaintext(self) -> String {
        match self {
            StoredToken::Sealed(s) | StoredToken::Legacy(s) => s,
        }
    }
}

impl std::fmt::Debug for StoredToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoredToken::Sealed(_) => f.write_str("Sealed([REDACTED])"),
            StoredToken::Legacy(_) => f.write_str("Legacy([REDACTED])"),
        }
    }
}

impl Vault {
    /// Read a stored value that is either an envelope or legacy plaintext.
    ///
    /// # Errors
    ///
    /// Any error from [`Vault::decrypt`] for values that look like envelopes.
    /// A failed envelope is never returned as plaintext.
    pub fn open_stored(&self, stored: &str) -> Result<StoredToken, VaultError> {
        if looks_encrypted(stored) {
            return self.decrypt(stored).map(StoredToken::Sealed);
        }
        if let Some(bare) = Envelope::decode_bare(stored) {
            match self.open(&bare) {
                // No ciphertext, so the plaintext is empty.
                Ok(_) => return Ok(StoredToken::Sealed(String::new())),
                Err(VaultError::Integrity) => {}
                Err(e) => return Err(e),
            }
        }
        debug!("stored value is legacy plaintext");
        Ok(StoredToken::Legacy(stored.to_owned()))
    }

    /// Return the sealed replacement for a legacy value, or `None` if `stored`
    /// is already an envelope that opens under this vault.
    ///
    /// # Errors
    ///
    /// Any error from [`Vault::open_stored`] or [`Vault::encrypt`].
    pub fn reseal_if_legacy(&self, stored: &str) -> Result<Option<String>, VaultError> {
        match self.open_stored(stored)? {
            StoredToken::Sealed(_) => Ok(None),
            StoredToken::Legacy(plaintext) => self.encrypt(&plaintext).map(Some),
        }
    }
}
