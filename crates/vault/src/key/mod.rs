//! Derived-key lifecycle.
//!
//! 1. The root [`Secret`](crate::crypto::Secret) is handed to a [`KeyCache`]
//!    when the [`Vault`](crate::Vault) is built. Nothing is derived yet.
//! 2. The first seal or open (or an explicit [`Vault::warm_up`](crate::Vault::warm_up))
//!    runs the scrypt derivation once and stores the key in the cache.
//! 3. Every later call borrows the cached key. It lives only in process
//!    memory and is wiped when the last `Vault` clone is dropped.
//!
//! # Security invariants
//!
//! - The secret, the intermediate salt and the key are **never** logged.
//! - Recomputing the key is always safe and yields the same bytes; caching is
//!   purely a cost optimisation.

pub mod cache;

pub use cache::KeyCache;
