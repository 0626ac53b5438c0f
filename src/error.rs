//! Custom error types for the bank ledger
//!
//! This module defines the error hierarchy for the ledger using thiserror.
//! Business-rule rejections of a transfer live in [`TransferError`] so that
//! callers can match on them without string inspection.

use thiserror::Error;

use crate::conversion::ConversionError;
use crate::models::{AccountId, Money, UserId};

/// The main error type for ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for caller input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// A transfer was rejected
    #[error(transparent)]
    Transfer(#[from] TransferError),

    /// Currency conversion failed outside of a transfer
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// The account is closed and cannot be modified
    #[error("Account is closed: {0}")]
    AccountClosed(AccountId),

    /// The acting user does not own the account
    #[error("User {user} is not an owner of account {account}")]
    NotOwner { user: UserId, account: AccountId },

    /// The user already holds the maximum number of open accounts
    #[error("Account limit reached ({limit} open accounts)")]
    AccountLimit { limit: usize },

    /// An account lock could not be acquired in time
    #[error("Timed out waiting for account {0}")]
    LockTimeout(AccountId),

    /// Password hashing or verification errors
    #[error("Credential error: {0}")]
    Credentials(String),
}

impl LedgerError {
    /// Create a "not found" error for accounts
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for users
    pub fn user_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "User",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Business-rule failures the caller can recover from by retrying with
    /// different input. Everything else is a resource failure.
    pub fn is_business_rule(&self) -> bool {
        match self {
            Self::Transfer(err) => err.is_business_rule(),
            Self::Validation(_)
            | Self::NotFound { .. }
            | Self::Duplicate { .. }
            | Self::AccountClosed(_)
            | Self::NotOwner { .. }
            | Self::AccountLimit { .. } => true,
            _ => false,
        }
    }
}

/// Reasons an attempted transfer was rejected.
///
/// A rejected transfer never leaves partial effects behind: balances,
/// histories and audit logs of both accounts are untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("Cannot transfer to the same account")]
    SameAccount,

    #[error("Transfer amount must be positive, got {0}")]
    InvalidAmount(crate::models::Amount),

    #[error("Account is closed: {0}")]
    Closed(AccountId),

    #[error("User {user} is not an owner of account {account}")]
    NotOwner { user: UserId, account: AccountId },

    /// Joint account policy requires every owner to confirm
    #[error("Transfer needs confirmation from {} more owner(s)", .missing.len())]
    ConfirmationRequired { missing: Vec<UserId> },

    #[error("Insufficient funds: need {required}, have {available}")]
    InsufficientFunds { required: Money, available: Money },

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl TransferError {
    /// Conversion failures are resource failures, the rest are business rules
    pub fn is_business_rule(&self) -> bool {
        !matches!(self, Self::Conversion(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
