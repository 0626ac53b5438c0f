//! Storage layer for the bank ledger
//!
//! One JSON file per entity, written atomically, inside per-entity-type
//! directories. The stores keep every entity in memory and write through on
//! each mutation; there are no deferred writes.

pub mod accounts;
pub mod file_io;
pub mod init;
pub mod search;
pub mod users;

pub use accounts::{AccountOrder, AccountStore};
pub use file_io::write_json_atomic;
pub use search::SearchOutcome;
pub use users::UserStore;

use crate::auth::CredentialHasher;
use crate::config::paths::LedgerPaths;
use crate::config::settings::Settings;
use crate::error::LedgerResult;

/// Main storage coordinator that provides access to both stores
pub struct Storage {
    paths: LedgerPaths,
    pub users: UserStore,
    pub accounts: AccountStore,
}

impl Storage {
    /// Load users, then accounts, seeding each empty directory.
    ///
    /// The seeded account is owned by the seeded administrator.
    pub fn open(
        paths: LedgerPaths,
        settings: &Settings,
        hasher: &dyn CredentialHasher,
    ) -> LedgerResult<Self> {
        paths.ensure_directories()?;

        let users = UserStore::load(paths.users_dir(), || init::default_users(hasher))?;

        let owner = users
            .get_by_login(init::DEFAULT_ADMIN_LOGIN)
            .filter(|user| user.is_admin())
            .or_else(|| users.all().into_iter().find(|user| user.is_admin()))
            .map(|user| user.id());

        let accounts = AccountStore::load(paths.accounts_dir(), settings.lock_timeout(), || {
            match owner {
                Some(owner) => init::default_accounts(owner, settings.default_currency),
                None => {
                    tracing::warn!("no administrator to own the default account");
                    Vec::new()
                }
            }
        })?;

        Ok(Self {
            paths,
            users,
            accounts,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }
}
