//! Core data models for the bank ledger
//!
//! This module contains the data structures of the ledger domain: money,
//! accounts, users and the transactions that move funds between accounts.

pub mod account;
pub mod ids;
pub mod money;
pub mod transaction;
pub mod user;

pub use account::{
    Account, AccountType, Authorization, JointAccountPolicy, TransferPolicy, TransferReceipt,
};
pub use ids::{AccountId, UserId};
pub use money::{Amount, Currency, CurrencyMismatch, Money, MoneyError, MoneyParseError};
pub use transaction::{Direction, Transaction};
pub use user::{LoginState, User, UserPreferences};

use chrono::{DateTime, SubsecRound, Utc};

/// Current time truncated to whole seconds, the resolution everything is
/// persisted with
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}
