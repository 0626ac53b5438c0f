//! Account repository for JSON storage
//!
//! Each account lives in its own `<id>.json` file. In memory every account
//! sits behind its own mutex so that two operations on the same account are
//! serialized while operations on unrelated accounts proceed independently.
//! Locks are taken with a timeout; a caller never waits forever.
//!
//! Mutations follow one pattern: clone the locked account, apply the change
//! to the clone, write it to disk, and only then publish it in memory. A
//! failed write therefore leaves both the file and the in-memory state as
//! they were.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard, RwLock};
use serde::{Deserialize, Serialize};

use crate::conversion::ConversionService;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, AccountId, Amount, Currency, UserId};

use super::file_io::{entity_path, load_entities, write_json_atomic};
use super::search::{rank_by_name, SearchOutcome};

/// How a user's accounts are listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountOrder {
    /// Largest balance first, compared in the base currency
    #[default]
    BalanceDesc,
    /// Alphabetical by display name
    Name,
}

type Slot = Arc<Mutex<Account>>;

/// Repository for account persistence
pub struct AccountStore {
    dir: PathBuf,
    lock_timeout: Duration,
    accounts: RwLock<HashMap<AccountId, Slot>>,
}

impl AccountStore {
    /// Load every account file in `dir`.
    ///
    /// When the directory holds no account files at all, the accounts
    /// returned by `seed` are written and loaded instead. Unreadable or
    /// inconsistent files are skipped with a warning.
    pub fn load(
        dir: impl Into<PathBuf>,
        lock_timeout: Duration,
        seed: impl FnOnce() -> Vec<Account>,
    ) -> LedgerResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;

        let loaded = load_entities::<Account>(&dir)?;
        let fresh = loaded.is_fresh();

        let store = Self {
            dir,
            lock_timeout,
            accounts: RwLock::new(HashMap::new()),
        };

        {
            let mut accounts = store.accounts.write();
            for account in loaded.entities {
                if let Err(reason) = account.check_consistency() {
                    tracing::warn!(account = %account.id(), %reason, "skipping inconsistent account");
                    continue;
                }
                accounts.insert(account.id(), Arc::new(Mutex::new(account)));
            }
        }

        if fresh {
            for account in seed() {
                store.insert(account)?;
            }
            tracing::info!(count = store.count(), "seeded default accounts");
        }

        tracing::debug!(count = store.count(), dir = %store.dir.display(), "accounts loaded");
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Get a snapshot of an account by ID
    pub fn get(&self, id: AccountId) -> LedgerResult<Option<Account>> {
        match self.slot(id) {
            Some(slot) => Ok(Some(self.lock(id, &slot)?.clone())),
            None => Ok(None),
        }
    }

    /// Snapshots of all accounts, ordered by display name
    pub fn all(&self) -> LedgerResult<Vec<Account>> {
        let slots: Vec<(AccountId, Slot)> = self
            .accounts
            .read()
            .iter()
            .map(|(id, slot)| (*id, Arc::clone(slot)))
            .collect();

        let mut accounts = slots
            .iter()
            .map(|(id, slot)| self.lock(*id, slot).map(|guard| guard.clone()))
            .collect::<LedgerResult<Vec<_>>>()?;
        accounts.sort_by(|a, b| {
            a.display_name()
                .cmp(&b.display_name())
                .then(a.id().cmp(&b.id()))
        });
        Ok(accounts)
    }

    pub fn count(&self) -> usize {
        self.accounts.read().len()
    }

    /// Persist and register a new account
    pub fn insert(&self, account: Account) -> LedgerResult<()> {
        let mut accounts = self.accounts.write();
        if accounts.contains_key(&account.id()) {
            return Err(LedgerError::Duplicate {
                entity_type: "Account",
                identifier: account.id().to_string(),
            });
        }
        self.write(&account)?;
        accounts.insert(account.id(), Arc::new(Mutex::new(account)));
        Ok(())
    }

    /// Write the current in-memory state of one account to its file
    pub fn save(&self, id: AccountId) -> LedgerResult<()> {
        let slot = self.require_slot(id)?;
        let guard = self.lock(id, &slot)?;
        self.write(&guard)
    }

    /// Apply `f` to one account and persist the result.
    ///
    /// If `f` fails or the write fails, nothing changes.
    pub fn update<T, E>(
        &self,
        id: AccountId,
        f: impl FnOnce(&mut Account) -> Result<T, E>,
    ) -> LedgerResult<T>
    where
        E: Into<LedgerError>,
    {
        let slot = self.require_slot(id)?;
        let mut guard = self.lock(id, &slot)?;

        let mut next = guard.clone();
        let out = f(&mut next).map_err(Into::into)?;
        self.write(&next)?;
        *guard = next;
        Ok(out)
    }

    /// Apply `f` to two distinct accounts as one unit and persist both.
    ///
    /// Locks are taken in ascending id order. If the second file cannot be
    /// written the first one is restored, so either both changes become
    /// visible or neither does.
    pub fn update_pair<T, E>(
        &self,
        a: AccountId,
        b: AccountId,
        f: impl FnOnce(&mut Account, &mut Account) -> Result<T, E>,
    ) -> LedgerResult<T>
    where
        E: Into<LedgerError>,
    {
        if a == b {
            return Err(LedgerError::Validation(format!(
                "account {} cannot be paired with itself",
                a
            )));
        }

        let slot_a = self.require_slot(a)?;
        let slot_b = self.require_slot(b)?;

        let (mut guard_a, mut guard_b) = if a < b {
            let guard_a = self.lock(a, &slot_a)?;
            let guard_b = self.lock(b, &slot_b)?;
            (guard_a, guard_b)
        } else {
            let guard_b = self.lock(b, &slot_b)?;
            let guard_a = self.lock(a, &slot_a)?;
            (guard_a, guard_b)
        };

        let mut next_a = guard_a.clone();
        let mut next_b = guard_b.clone();
        let out = f(&mut next_a, &mut next_b).map_err(Into::into)?;

        self.write(&next_a)?;
        if let Err(err) = self.write(&next_b) {
            if let Err(restore) = self.write(&guard_a) {
                tracing::error!(account = %a, error = %restore, "failed to restore account file");
            }
            return Err(err);
        }

        *guard_a = next_a;
        *guard_b = next_b;
        Ok(out)
    }

    /// Find accounts by exact id or fuzzy display name.
    ///
    /// Fuzzy matches skip closed accounts; an exact id always resolves.
    pub fn search(&self, query: &str, threshold: f64) -> LedgerResult<SearchOutcome<Account>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchOutcome::NoQuery);
        }

        if let Ok(id) = AccountId::parse(query) {
            return Ok(SearchOutcome::from_matches(
                self.get(id)?.into_iter().collect(),
            ));
        }

        let open = self.all()?.into_iter().filter(|a| !a.is_closed());
        Ok(SearchOutcome::from_matches(rank_by_name(
            open,
            query,
            threshold,
            Account::display_name,
        )))
    }

    /// Open accounts owned by `user`, in the requested order
    pub fn accounts_owned_by(
        &self,
        user: UserId,
        order: AccountOrder,
        base: Currency,
        converter: &dyn ConversionService,
    ) -> LedgerResult<Vec<Account>> {
        let owned: Vec<Account> = self
            .all()?
            .into_iter()
            .filter(|a| !a.is_closed() && a.is_owner(user))
            .collect();

        match order {
            AccountOrder::Name => Ok(owned),
            AccountOrder::BalanceDesc => {
                let mut keyed: Vec<(Option<Amount>, Account)> = owned
                    .into_iter()
                    .map(|account| match account.balance().convert_to(base, converter) {
                        Ok(normalized) => (Some(normalized.amount()), account),
                        Err(err) => {
                            tracing::warn!(
                                account = %account.id(),
                                error = %err,
                                "cannot normalize balance, listing account last"
                            );
                            (None, account)
                        }
                    })
                    .collect();
                // Stable: equal balances keep name order; None sorts below Some
                keyed.sort_by(|a, b| b.0.cmp(&a.0));
                Ok(keyed.into_iter().map(|(_, account)| account).collect())
            }
        }
    }

    /// Number of open accounts owned by `user`
    pub fn count_owned_by(&self, user: UserId) -> LedgerResult<usize> {
        Ok(self
            .all()?
            .iter()
            .filter(|a| !a.is_closed() && a.is_owner(user))
            .count())
    }

    fn slot(&self, id: AccountId) -> Option<Slot> {
        self.accounts.read().get(&id).cloned()
    }

    fn require_slot(&self, id: AccountId) -> LedgerResult<Slot> {
        self.slot(id)
            .ok_or_else(|| LedgerError::account_not_found(id.to_string()))
    }

    fn lock<'a>(&self, id: AccountId, slot: &'a Slot) -> LedgerResult<MutexGuard<'a, Account>> {
        slot.try_lock_for(self.lock_timeout).ok_or_else(|| {
            tracing::warn!(account = %id, timeout = ?self.lock_timeout, "account lock timed out");
            LedgerError::LockTimeout(id)
        })
    }

    fn write(&self, account: &Account) -> LedgerResult<()> {
        write_json_atomic(entity_path(&self.dir, account.id()), account)
    }
}
