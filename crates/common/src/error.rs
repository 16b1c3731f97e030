//! Error taxonomy shared by every crate that seals or opens envelopes.

use thiserror::Error;

/// Errors produced while sealing or opening an envelope.
///
/// The set is closed so callers can pick a recovery policy per variant:
/// - [`VaultError::Configuration`] → operational alert, fail the enclosing operation
/// - [`VaultError::Format`] → stored value is unusable (not an envelope, or corrupted)
/// - [`VaultError::Integrity`] → wrong secret or tampered data; credential unusable
///
/// None of the variants is retryable: identical inputs always yield the same outcome.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The root secret is missing or empty, or the KDF cost parameters are invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The envelope is not valid base64 or is shorter than the minimum structural length.
    #[error("malformed envelope: {0}")]
    Format(String),

    /// Authentication tag verification failed.
    ///
    /// Carries no detail: wrong key, wrong nonce, corrupted ciphertext and
    /// corrupted tag are deliberately indistinguishable.
    #[error("envelope failed authentication")]
    Integrity,
}

/// Payload-free discriminant of [`VaultError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Format,
    Integrity,
}

impl VaultError {
    /// Returns the discriminant of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            VaultError::Configuration(_) => ErrorKind::Configuration,
            VaultError::Format(_) => ErrorKind::Format,
            VaultError::Integrity => ErrorKind::Integrity,
        }
    }

    /// Stable machine-readable code, safe to put in logs and metrics labels.
    pub fn code(&self) -> &'static str {
        match self {
            VaultError::Configuration(_) => "configuration_error",
            VaultError::Format(_) => "format_error",
            VaultError::Integrity => "integrity_error",
        }
    }

    /// Always `false`. Retrying with the same secret and envelope cannot succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Returns `true` when the stored value itself is at fault and the owning
    /// record should be flagged for re-authentication.
    ///
    /// [`VaultError::Configuration`] is an operational fault, not a data fault.
    pub fn credential_unusable(&self) -> bool {
        matches!(self, VaultError::Format(_) | VaultError::Integrity)
    }
}
