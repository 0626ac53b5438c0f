//! Account service
//!
//! Ownership checks, per-user limits and lookups on top of the account
//! store. Every mutation goes through [`AccountStore::update`] and is on
//! disk before the call returns.
//!
//! [`AccountStore::update`]: crate::storage::AccountStore::update

use crate::config::Settings;
use crate::conversion::ConversionService;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, AccountId, AccountType, Currency, User, UserId};
use crate::storage::{SearchOutcome, Storage};

/// Service for account management
pub struct AccountService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
    converter: &'a dyn ConversionService,
}

impl<'a> AccountService<'a> {
    pub fn new(
        storage: &'a Storage,
        settings: &'a Settings,
        converter: &'a dyn ConversionService,
    ) -> Self {
        Self {
            storage,
            settings,
            converter,
        }
    }

    /// Open a new account for `owner`
    pub fn open(
        &self,
        owner: UserId,
        account_type: AccountType,
        currency: Currency,
        name: Option<String>,
    ) -> LedgerResult<Account> {
        self.require_user(owner)?;
        self.ensure_convertible(currency)?;
        self.ensure_below_limit(owner)?;

        let account = Account::open(account_type, currency, owner, name);
        self.storage.accounts.insert(account.clone())?;

        tracing::info!(account = %account.id(), owner = %owner, %currency, "account opened");
        Ok(account)
    }

    /// Get an account by ID
    pub fn get(&self, id: AccountId) -> LedgerResult<Account> {
        self.storage
            .accounts
            .get(id)?
            .ok_or_else(|| LedgerError::account_not_found(id.to_string()))
    }

    /// Search by exact id or fuzzy name
    pub fn find(&self, query: &str) -> LedgerResult<SearchOutcome<Account>> {
        self.storage
            .accounts
            .search(query, self.settings.search_threshold)
    }

    /// Open accounts `user` owns, in the configured order
    pub fn accessible_accounts(&self, user: UserId) -> LedgerResult<Vec<Account>> {
        self.storage.accounts.accounts_owned_by(
            user,
            self.settings.account_order,
            self.settings.base_currency,
            self.converter,
        )
    }

    /// Add `new_owner` as a co-owner. Returns `false` if they already own it.
    pub fn add_owner(
        &self,
        acting: UserId,
        id: AccountId,
        new_owner: UserId,
    ) -> LedgerResult<bool> {
        self.require_user(new_owner)?;

        let current = self.get(id)?;
        ensure_owner(&current, acting)?;
        ensure_open(&current)?;
        if current.is_owner(new_owner) {
            return Ok(false);
        }
        self.ensure_below_limit(new_owner)?;

        let added = self.storage.accounts.update(id, |account| {
            ensure_owner(account, acting)?;
            ensure_open(account)?;
            Ok::<_, LedgerError>(account.add_owner(acting, new_owner))
        })?;

        if added {
            tracing::info!(account = %id, owner = %new_owner, "co-owner added");
        }
        Ok(added)
    }

    pub fn rename(&self, acting: UserId, id: AccountId, name: &str) -> LedgerResult<()> {
        self.storage.accounts.update(id, |account| {
            ensure_owner(account, acting)?;
            ensure_open(account)?;
            account.rename(acting, name);
            Ok::<_, LedgerError>(())
        })
    }

    /// Close an account. Returns `false` if it was already closed.
    pub fn close(&self, acting: UserId, id: AccountId) -> LedgerResult<bool> {
        let current = self.get(id)?;
        ensure_owner(&current, acting)?;
        if current.is_closed() {
            return Ok(false);
        }

        let closed = self.storage.accounts.update(id, |account| {
            ensure_owner(account, acting)?;
            Ok::<_, LedgerError>(account.close(acting))
        })?;

        if closed {
            tracing::info!(account = %id, by = %acting, "account closed");
        }
        Ok(closed)
    }

    /// Record that `user` viewed the account and return it.
    ///
    /// Owners and administrators may view any account, closed ones included.
    pub fn log_access(&self, user: UserId, id: AccountId) -> LedgerResult<Account> {
        let viewer = self.require_user(user)?;
        self.storage.accounts.update(id, |account| {
            if !viewer.is_admin() {
                ensure_owner(account, user)?;
            }
            account.log_access(user);
            Ok::<_, LedgerError>(account.clone())
        })
    }

    fn require_user(&self, id: UserId) -> LedgerResult<User> {
        self.storage
            .users
            .get(id)
            .ok_or_else(|| LedgerError::user_not_found(id.to_string()))
    }

    /// Every account must be comparable in the base currency
    fn ensure_convertible(&self, currency: Currency) -> LedgerResult<()> {
        let rates = self.settings.rates();
        if currency != rates.base() && rates.rate(currency).is_none() {
            return Err(LedgerError::Validation(format!(
                "No exchange rate configured for {}",
                currency
            )));
        }
        Ok(())
    }

    fn ensure_below_limit(&self, user: UserId) -> LedgerResult<()> {
        let limit = self.settings.max_accounts_per_user;
        if self.storage.accounts.count_owned_by(user)? >= limit {
            return Err(LedgerError::AccountLimit { limit });
        }
        Ok(())
    }
}

fn ensure_owner(account: &Account, user: UserId) -> LedgerResult<()> {
    if !account.is_owner(user) {
        return Err(LedgerError::NotOwner {
            user,
            account: account.id(),
        });
    }
    Ok(())
}

fn ensure_open(account: &Account) -> LedgerResult<()> {
    if account.is_closed() {
        return Err(LedgerError::AccountClosed(account.id()));
    }
    Ok(())
}
