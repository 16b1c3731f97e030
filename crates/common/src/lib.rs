//! Error taxonomy and envelope wire format shared across `token-vault` crates.

pub mod envelope;
pub mod error;

pub use envelope::{looks_encrypted, Envelope, MIN_ENVELOPE_LEN, NONCE_LEN, TAG_LEN};
pub use error::{ErrorKind, VaultError};
