//! [`Secret`]: the root encryption secret every key is derived from.

use std::fmt;

use common::VaultError;
use zeroize::Zeroizing;

/// The application's root encryption secret.
///
/// Constructed once from configuration and passed explicitly to whatever
/// derives keys from it. The bytes are wiped when the value is dropped and are
/// never printed.
#[derive(Clone)]
pub struct Secret(Zeroizing<Vec<u8>>);

impl Secret {
    /// Wrap the configured secret.
    ///
    /// The bytes are used verbatim; a secret that looks like base64 is not decoded.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Configuration`] if `value` is empty.
    pub fn new(value: impl AsRef<[u8]>) -> Result<Self, VaultError> {
        let bytes = value.as_ref();
        if bytes.is_empty() {
            return Err(VaultError::Configuration(
                "ENCRYPTION_SECRET is not configured".into(),
            ));
        }
        Ok(Self(Zeroizing::new(bytes.to_vec())))
    }

    pub(crate) fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([REDACTED])")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_secret_is_a_configuration_error() {
        let err = Secret::new("").unwrap_err();
        assert!(matches!(err, VaultError::Configuration(_)));
    }

    #[test]
    fn bytes_are_kept_verbatim() {
        let s = Secret::new("c2VjcmV0").unwrap();
        assert_eq!(s.expose(), b"c2VjcmV0");
    }

    #[test]
    fn redacted_in_debug_and_display() {
        let s = Secret::new("hunter2").unwrap();
        assert!(!format!("{s:?}").contains("hunter2"));
        assert!(!format!("{s}").contains("hunter2"));
        assert!(format!("{s:?}").contains("REDACTED"));
    }
}
