//! AES-256-GCM envelope primitives and scrypt key derivation.
//!
//! This module is free of configuration, logging and caching concerns. It
//! provides the pure operations the [`Vault`](crate::Vault) composes:
//!
//! - [`secret`]: the root secret wrapper
//! - [`kdf`]: secret → 32-byte key
//! - [`cipher`]: seal / open with a detached tag
//!
//! The wire layout the results are packed into lives in [`common::envelope`].

pub mod cipher;
pub mod kdf;
pub mod secret;

pub use kdf::{derive_key, DerivedKey, KdfParams, KEY_LEN};
pub use secret::Secret;
