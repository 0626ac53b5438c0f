//! Credentials and login
//!
//! Password hashing sits behind [`CredentialHasher`] so the ledger never
//! depends on a particular algorithm; [`Argon2Hasher`] is the one shipped.
//! [`LoginGuard`] adds per-user throttling on top.

mod login;
mod password;

pub use login::{LoginGuard, LoginOutcome};
pub use password::{Argon2Hasher, CredentialHasher, Secret};
