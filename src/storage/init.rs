//! Default data for a fresh installation

use crate::auth::CredentialHasher;
use crate::error::LedgerResult;
use crate::models::{Account, AccountType, Currency, User, UserId};

pub const DEFAULT_ADMIN_LOGIN: &str = "admin";
const DEFAULT_ADMIN_EMAIL: &str = "admin@bank.com";
const DEFAULT_ADMIN_PASSWORD: &str = "admin";

/// The administrator created on first run
pub fn default_users(hasher: &dyn CredentialHasher) -> LedgerResult<Vec<User>> {
    let hash = hasher.hash(DEFAULT_ADMIN_PASSWORD)?;
    let admin = User::new(
        DEFAULT_ADMIN_LOGIN,
        DEFAULT_ADMIN_EMAIL,
        "The",
        "Administrator",
        hash,
    )
    .with_admin(true);
    Ok(vec![admin])
}

/// One empty checking account owned by `owner`
pub fn default_accounts(owner: UserId, currency: Currency) -> Vec<Account> {
    vec![Account::open(AccountType::Checking, currency, owner, None)]
}
