//! Account model
//!
//! An account owns its balance, its owner set, its transaction history and
//! its audit log. Fields are private: the only ways to change an account are
//! opening it, the ownership and naming operations, closure, access logging
//! and [`Account::authorize_transfer`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::ids::{AccountId, UserId};
use super::money::{Amount, Currency, Money};
use super::transaction::Transaction;
use super::timestamp_now;
use crate::audit::{AuditEvent, AuditEventKind, AuditLog};
use crate::conversion::ConversionService;
use crate::error::TransferError;

/// Type of account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    #[serde(rename = "SAVINGS_ACCOUNT")]
    Savings,
    #[serde(rename = "CHECKING_ACCOUNT")]
    Checking,
    #[serde(rename = "RETIREMENT_ACCOUNT")]
    Retirement,
}

impl AccountType {
    /// Parse account type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "savings" | "savings_account" => Some(Self::Savings),
            "checking" | "checking_account" => Some(Self::Checking),
            "retirement" | "retirement_account" => Some(Self::Retirement),
            _ => None,
        }
    }
}

impl Default for AccountType {
    fn default() -> Self {
        Self::Checking
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Savings => write!(f, "Savings"),
            Self::Checking => write!(f, "Checking"),
            Self::Retirement => write!(f, "Retirement"),
        }
    }
}

/// Whether co-owners of a joint account may transfer on their own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointAccountPolicy {
    /// Any single owner may authorize a transfer
    #[default]
    Independent,
    /// Every owner must have confirmed the transfer
    AllOwners,
}

/// Fee and authorization rules applied to every transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferPolicy {
    /// Charged to the sender, converted into the sender's currency at
    /// authorization time
    pub fee: Money,
    pub joint_accounts: JointAccountPolicy,
}

impl TransferPolicy {
    pub fn new(fee: Money) -> Self {
        Self {
            fee,
            joint_accounts: JointAccountPolicy::default(),
        }
    }

    pub fn with_joint_accounts(mut self, policy: JointAccountPolicy) -> Self {
        self.joint_accounts = policy;
        self
    }
}

/// Who is asking for a transfer, plus any co-owners who confirmed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    pub initiator: UserId,
    pub confirmations: BTreeSet<UserId>,
}

impl Authorization {
    pub fn new(initiator: UserId) -> Self {
        Self {
            initiator,
            confirmations: BTreeSet::new(),
        }
    }

    pub fn confirmed_by(mut self, user: UserId) -> Self {
        self.confirmations.insert(user);
        self
    }

    /// The initiator counts as having approved
    pub fn has_approved(&self, user: UserId) -> bool {
        self.initiator == user || self.confirmations.contains(&user)
    }
}

impl From<UserId> for Authorization {
    fn from(initiator: UserId) -> Self {
        Self::new(initiator)
    }
}

/// Structured result of a successful transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub outgoing: Transaction,
    pub incoming: Transaction,
    /// Fee in the sender's currency
    pub fee: Money,
    /// Total taken from the sender (amount plus fee)
    pub debited: Money,
    /// Amount added to the receiver, in the receiver's currency
    pub credited: Money,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A ledger account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    id: AccountId,

    #[serde(rename = "type")]
    account_type: AccountType,

    currency: Currency,

    /// Persisted independently of the history; never re-derived on load
    balance: Amount,

    #[serde(default)]
    name: Option<String>,

    owners: BTreeSet<UserId>,

    #[serde(default, skip_serializing_if = "is_false")]
    closed: bool,

    #[serde(default)]
    transaction_history: Vec<Transaction>,

    #[serde(default)]
    audit_log: AuditLog,
}

impl Account {
    /// Open a new account with a zero balance owned by `owner`
    pub fn open(
        account_type: AccountType,
        currency: Currency,
        owner: UserId,
        name: Option<String>,
    ) -> Self {
        let mut audit_log = AuditLog::new();
        audit_log.append(AuditEvent::creation(owner));

        Self {
            id: AccountId::new(),
            account_type,
            currency,
            balance: Amount::zero(),
            name: name.and_then(normalize_name),
            owners: BTreeSet::from([owner]),
            closed: false,
            transaction_history: Vec::new(),
            audit_log,
        }
    }

    /// Seed an opening balance on an account that has not been used yet.
    ///
    /// Meant for seeding data: it records no transaction and is ignored for
    /// negative values.
    pub fn with_opening_balance(mut self, balance: Amount) -> Self {
        debug_assert!(self.transaction_history.is_empty());
        if !balance.is_negative() {
            self.balance = balance;
        }
        self
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn balance(&self) -> Money {
        Money::new(self.balance, self.currency)
    }

    pub fn owners(&self) -> &BTreeSet<UserId> {
        &self.owners
    }

    pub fn is_owner(&self, user: UserId) -> bool {
        self.owners.contains(&user)
    }

    pub fn is_joint(&self) -> bool {
        self.owners.len() > 1
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The account name, or `"<Type> (<short id>)"` when unnamed
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{} ({})", self.account_type, self.id.short()),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transaction_history
    }

    pub fn audit_log(&self) -> &AuditLog {
        &self.audit_log
    }

    /// Structural checks for an account read back from storage
    pub fn check_consistency(&self) -> Result<(), String> {
        if self.balance.is_negative() {
            return Err(format!("negative balance {}", self.balance()));
        }
        if !self.closed && self.owners.is_empty() {
            return Err("open account without owners".into());
        }
        Ok(())
    }

    /// Add a co-owner. Returns `false` if `new_owner` already owns the account.
    pub fn add_owner(&mut self, acting: UserId, new_owner: UserId) -> bool {
        if !self.owners.insert(new_owner) {
            return false;
        }
        self.audit_log.append(AuditEvent::modification(
            acting,
            format!("owner_added={}", new_owner),
        ));
        true
    }

    /// Change the account name. A blank name clears it.
    pub fn rename(&mut self, acting: UserId, new_name: impl Into<String>) {
        self.name = normalize_name(new_name.into());
        let detail = match &self.name {
            Some(name) => format!("renamed={}", name),
            None => "renamed=".to_string(),
        };
        self.audit_log.append(AuditEvent::modification(acting, detail));
    }

    /// Close the account. Returns `false` if it was already closed.
    pub fn close(&mut self, acting: UserId) -> bool {
        if self.closed {
            return false;
        }
        self.closed = true;
        self.audit_log.append(AuditEvent::closure(acting));
        true
    }

    pub fn log_access(&mut self, user: UserId) {
        self.audit_log.append(AuditEvent::access(user));
    }

    /// Move `amount` (in this account's currency) to `to`.
    ///
    /// Every check and every conversion happens before the first mutation,
    /// so a rejection leaves both accounts exactly as they were. On success
    /// the sender is debited `amount + fee`, the receiver is credited the
    /// converted amount, and a paired outgoing/incoming record is appended
    /// to each history with one shared timestamp.
    pub fn authorize_transfer(
        &mut self,
        amount: Amount,
        to: &mut Account,
        authorization: impl Into<Authorization>,
        policy: &TransferPolicy,
        converter: &dyn ConversionService,
    ) -> Result<TransferReceipt, TransferError> {
        let authorization = authorization.into();

        if self.id == to.id {
            return Err(TransferError::SameAccount);
        }
        if !amount.is_positive() {
            return Err(TransferError::InvalidAmount(amount));
        }
        if self.closed {
            return Err(TransferError::Closed(self.id));
        }
        if to.closed {
            return Err(TransferError::Closed(to.id));
        }
        if !self.is_owner(authorization.initiator) {
            return Err(TransferError::NotOwner {
                user: authorization.initiator,
                account: self.id,
            });
        }
        if policy.joint_accounts == JointAccountPolicy::AllOwners {
            let missing: Vec<UserId> = self
                .owners
                .iter()
                .copied()
                .filter(|owner| !authorization.has_approved(*owner))
                .collect();
            if !missing.is_empty() {
                return Err(TransferError::ConfirmationRequired { missing });
            }
        }

        let fee = policy.fee.convert_to(self.currency, converter)?;
        let sent = Money::new(amount, self.currency);
        let received = sent.convert_to(to.currency, converter)?;

        let debit = amount
            .checked_add(fee.amount())
            .ok_or(TransferError::InvalidAmount(amount))?;
        if self.balance < debit {
            return Err(TransferError::InsufficientFunds {
                required: Money::new(debit, self.currency),
                available: self.balance(),
            });
        }
        let credited_balance = to
            .balance
            .checked_add(received.amount())
            .ok_or(TransferError::InvalidAmount(amount))?;

        // Nothing below can fail
        let now = timestamp_now();
        let outgoing = Transaction::outgoing(to.id, authorization.initiator, sent, now);
        let incoming = Transaction::incoming(self.id, received, now);

        self.balance -= debit;
        to.balance = credited_balance;
        self.transaction_history.push(outgoing.clone());
        to.transaction_history.push(incoming.clone());
        self.audit_log.append(AuditEvent::new(
            AuditEventKind::Modification,
            authorization.initiator,
            now,
            Some(format!("transfer={} to={}", sent, to.id)),
        ));

        assert!(
            !self.balance.is_negative() && !to.balance.is_negative(),
            "transfer left a negative balance"
        );
        assert!(
            outgoing.pairs_with(self.id, &incoming, to.id),
            "transfer records are not paired"
        );

        Ok(TransferReceipt {
            outgoing,
            incoming,
            fee,
            debited: Money::new(debit, self.currency),
            credited: received,
        })
    }
}

fn normalize_name(name: String) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
