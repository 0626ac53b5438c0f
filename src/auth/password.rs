//! Password hashing using Argon2id
//!
//! Hashes are stored as PHC strings, so the salt and cost parameters travel
//! with the hash and older hashes keep verifying after the defaults change.

use std::fmt;
use std::ops::Deref;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use zeroize::Zeroizing;

use crate::error::{LedgerError, LedgerResult};

/// Hashes and verifies user passwords
pub trait CredentialHasher: Send + Sync {
    /// Produce a self-describing hash of `password`
    fn hash(&self, password: &str) -> LedgerResult<String>;

    /// Check `password` against a stored hash. A mismatch is `Ok(false)`;
    /// an unparseable hash is an error.
    fn verify(&self, password: &str, hash: &str) -> LedgerResult<bool>;
}

/// Argon2id hasher with configurable cost
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Memory cost in KiB, iterations and parallelism
    pub fn with_params(memory_cost: u32, time_cost: u32, parallelism: u32) -> LedgerResult<Self> {
        let params = Params::new(memory_cost, time_cost, parallelism, None)
            .map_err(|e| LedgerError::Credentials(format!("Invalid Argon2 parameters: {}", e)))?;
        Ok(Self { params })
    }

    /// Minimal cost, for tests and scripted setups
    pub fn low_cost() -> Self {
        Self {
            params: Params::new(Params::MIN_M_COST, 1, 1, None).unwrap_or_default(),
        }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> LedgerResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| LedgerError::Credentials(format!("Password hashing failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> LedgerResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| LedgerError::Credentials(format!("Invalid password hash: {}", e)))?;
        match self.argon2().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(LedgerError::Credentials(format!(
                "Password verification failed: {}",
                e
            ))),
        }
    }
}

/// A password held in memory that is wiped on drop
pub struct Secret {
    inner: Zeroizing<String>,
}

impl Secret {
    pub fn new(s: impl Into<String>) -> Self {
        Self {
            inner: Zeroizing::new(s.into()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl Deref for Secret {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<String> for Secret {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret([REDACTED])")
    }
}
