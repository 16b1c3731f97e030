//! Envelope wire format.
//!
//! ```text
//! base64( nonce[16] ‖ tag[16] ‖ ciphertext[..] )
//! ```
//!
//! Standard base64 alphabet with padding. The ciphertext length is not
//! encoded: everything after the tag is ciphertext.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::VaultError;

/// Byte length of the per-envelope nonce (128 bits).
pub const NONCE_LEN: usize = 16;

/// Byte length of the authentication tag (128 bits).
pub const TAG_LEN: usize = 16;

/// Smallest decoded length accepted as an envelope: nonce, tag and one ciphertext byte.
pub const MIN_ENVELOPE_LEN: usize = NONCE_LEN + TAG_LEN + 1;

/// A parsed envelope.
#[derive(Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Raw nonce bytes.
    pub nonce: [u8; NONCE_LEN],
    /// Raw authentication tag bytes.
    pub tag: [u8; TAG_LEN],
    /// Raw ciphertext bytes, same length as the plaintext.
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Encode this envelope to its stored string representation.
    pub fn encode(&self) -> String {
        let mut combined = Vec::with_capacity(NONCE_LEN + TAG_LEN + self.ciphertext.len());
        combined.extend_from_slice(&self.nonce);
        combined.extend_from_slice(&self.tag);
        combined.extend_from_slice(&self.ciphertext);
        STANDARD.encode(combined)
    }

    /// Parse a stored string back into an [`Envelope`].
    ///
    /// Surrounding ASCII whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Format`] if the value is not valid base64 or decodes
    /// to fewer than [`MIN_ENVELOPE_LEN`] bytes.
    pub fn decode(value: &str) -> Result<Self, VaultError> {
        let combined = STANDARD
            .decode(value.trim())
            .map_err(|e| VaultError::Format(format!("invalid base64: {e}")))?;
        if combined.len() < MIN_ENVELOPE_LEN {
            return Err(VaultError::Format(format!(
                "decoded length {} is below the minimum of {MIN_ENVELOPE_LEN} bytes",
                combined.len()
            )));
        }

        Ok(Self::split(&combined))
    }

    /// Parse a value that is exactly a nonce and a tag with no ciphertext.
    ///
    /// An empty plaintext seals to this shape, which falls one byte short of
    /// [`MIN_ENVELOPE_LEN`] and is therefore rejected by [`Envelope::decode`].
    /// Returns `None` for anything else. Callers must authenticate the result
    /// before trusting it.
    pub fn decode_bare(value: &str) -> Option<Self> {
        let combined = STANDARD.decode(value.trim()).ok()?;
        (combined.len() == NONCE_LEN + TAG_LEN).then(|| Self::split(&combined))
    }

    fn split(combined: &[u8]) -> Self {
        let (nonce_bytes, rest) = combined.split_at(NONCE_LEN);
        let (tag_bytes, ciphertext) = rest.split_at(TAG_LEN);

        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(nonce_bytes);
        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(tag_bytes);

        Self {
            nonce,
            tag,
            ciphertext: ciphertext.to_vec(),
        }
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Envelope {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Lengths only; the stored value is a credential.
        f.debug_struct("Envelope")
            .field("ciphertext_len", &self.ciphertext.len())
            .finish_non_exhaustive()
    }
}

/// Returns `true` if `value` is plausibly an envelope.
///
/// Checks only that the value is base64 and meets the minimum decoded length.
/// This is a heuristic for telling legacy plaintext apart from envelopes; it is
/// not a security boundary and accepts tampered envelopes.
pub fn looks_encrypted(value: &str) -> bool {
    match STANDARD.decode(value.trim()) {
        Ok(decoded) => decoded.len() >= MIN_ENVELOPE_LEN,
        Err(_) => false,
    }
}
