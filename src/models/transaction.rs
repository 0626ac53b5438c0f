//! Transaction model
//!
//! A transaction records one side of a transfer. Every outgoing record on
//! the sender is paired with exactly one incoming record on the receiver,
//! both created by [`Account::authorize_transfer`](super::Account::authorize_transfer).
//! The counterparty is stored by id and resolved through the account store
//! when needed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, UserId};
use super::money::{Amount, Currency, Money};
use super::Account;
use crate::error::LedgerResult;
use crate::storage::AccountStore;

/// Which way money moved relative to the account holding the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Incoming,
    Outgoing,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incoming => write!(f, "Incoming"),
            Self::Outgoing => write!(f, "Outgoing"),
        }
    }
}

/// An immutable record of a single fund movement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Transaction {
    /// Funds received from `target`, already converted into the holder's currency
    Incoming {
        target: AccountId,
        amount: Amount,
        currency: Currency,
        #[serde(with = "chrono::serde::ts_seconds")]
        date_time: DateTime<Utc>,
    },

    /// Funds sent to `target`, authorized by `user`, in the holder's currency
    Outgoing {
        target: AccountId,
        user: UserId,
        amount: Amount,
        currency: Currency,
        #[serde(with = "chrono::serde::ts_seconds")]
        date_time: DateTime<Utc>,
    },
}

impl Transaction {
    pub(crate) fn incoming(from: AccountId, money: Money, at: DateTime<Utc>) -> Self {
        Self::Incoming {
            target: from,
            amount: money.amount(),
            currency: money.currency(),
            date_time: at,
        }
    }

    pub(crate) fn outgoing(to: AccountId, by: UserId, money: Money, at: DateTime<Utc>) -> Self {
        Self::Outgoing {
            target: to,
            user: by,
            amount: money.amount(),
            currency: money.currency(),
            date_time: at,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Self::Incoming { .. } => Direction::Incoming,
            Self::Outgoing { .. } => Direction::Outgoing,
        }
    }

    /// The account on the other side of the movement
    pub fn counterparty(&self) -> AccountId {
        match self {
            Self::Incoming { target, .. } | Self::Outgoing { target, .. } => *target,
        }
    }

    /// The user who authorized an outgoing transfer
    pub fn authorized_by(&self) -> Option<UserId> {
        match self {
            Self::Incoming { .. } => None,
            Self::Outgoing { user, .. } => Some(*user),
        }
    }

    pub fn money(&self) -> Money {
        match self {
            Self::Incoming {
                amount, currency, ..
            }
            | Self::Outgoing {
                amount, currency, ..
            } => Money::new(*amount, *currency),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Incoming { date_time, .. } | Self::Outgoing { date_time, .. } => *date_time,
        }
    }

    /// Look up the counterparty account. `None` if it is not in the store.
    pub fn resolve_counterparty(&self, accounts: &AccountStore) -> LedgerResult<Option<Account>> {
        accounts.get(self.counterparty())
    }

    /// Check whether `other` is the matching record on the counterparty
    pub fn pairs_with(&self, holder: AccountId, other: &Transaction, other_holder: AccountId) -> bool {
        self.direction() != other.direction()
            && self.counterparty() == other_holder
            && other.counterparty() == holder
            && self.timestamp() == other.timestamp()
    }
}
