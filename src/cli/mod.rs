//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod transfer;
pub mod user;

pub use account::{handle_account_command, AccountCommands};
pub use transfer::handle_transfer_command;
pub use user::{handle_user_command, UserCommands};

use crate::auth::{CredentialHasher, LoginGuard, LoginOutcome, Secret};
use crate::config::Settings;
use crate::conversion::ConversionService;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, User};
use crate::services::{AccountService, UserService};
use crate::storage::{SearchOutcome, Storage};

/// Environment variable consulted before prompting for a password
pub const PASSWORD_ENV: &str = "BANK_PASSWORD";

/// Everything a command handler needs
pub struct Context<'a> {
    pub storage: &'a Storage,
    pub settings: &'a Settings,
    pub converter: &'a dyn ConversionService,
    pub hasher: &'a dyn CredentialHasher,
    pub guard: &'a LoginGuard,
}

impl<'a> Context<'a> {
    pub fn accounts(&self) -> AccountService<'a> {
        AccountService::new(self.storage, self.settings, self.converter)
    }

    pub fn users(&self) -> UserService<'a> {
        UserService::new(self.storage, self.settings, self.hasher, self.guard)
    }

    /// Log `login` in, reading the password from the environment or the terminal
    pub fn authenticate(&self, login: Option<&str>) -> LedgerResult<User> {
        let login = login.ok_or_else(|| {
            LedgerError::Validation("This command requires --login <USERNAME|EMAIL>".into())
        })?;
        let password = read_password(&format!("Password for {}: ", login), true)?;
        self.check_credentials(login, &password)
    }

    /// Check a password for `login`, always prompting on the terminal
    pub fn confirm(&self, login: &str) -> LedgerResult<User> {
        let password = read_password(&format!("Confirmation password for {}: ", login), false)?;
        self.check_credentials(login, &password)
    }

    fn check_credentials(&self, login: &str, password: &Secret) -> LedgerResult<User> {
        match self.users().authenticate(login, password)? {
            LoginOutcome::Authenticated(user) => Ok(user),
            LoginOutcome::UnknownUser => Err(LedgerError::user_not_found(login)),
            LoginOutcome::WrongPassword { remaining } => Err(LedgerError::Credentials(format!(
                "Wrong password for {} ({} attempt(s) left)",
                login, remaining
            ))),
            LoginOutcome::LockedOut { retry_after } => Err(LedgerError::Credentials(format!(
                "Too many failed logins for {}, retry in {}s",
                login,
                retry_after.as_secs().max(1)
            ))),
        }
    }
}

/// Read a password from [`PASSWORD_ENV`] (when allowed) or the terminal
pub fn read_password(prompt: &str, allow_env: bool) -> LedgerResult<Secret> {
    if allow_env {
        if let Ok(password) = std::env::var(PASSWORD_ENV) {
            return Ok(Secret::from(password));
        }
    }
    rpassword::prompt_password(prompt)
        .map(Secret::from)
        .map_err(|e| LedgerError::Io(format!("Failed to read password: {}", e)))
}

/// Resolve an account argument (id or name) to exactly one account.
///
/// A name that fuzzy-matches several accounts is refused unless exactly one
/// of them carries that name verbatim.
pub fn resolve_account(service: &AccountService<'_>, query: &str) -> LedgerResult<Account> {
    match service.find(query)? {
        SearchOutcome::NoQuery => Err(LedgerError::Validation(
            "Account name or ID cannot be empty".into(),
        )),
        SearchOutcome::NoMatch => Err(LedgerError::account_not_found(query)),
        SearchOutcome::Matches(found) => pick_one(
            found,
            query,
            "account",
            Account::display_name,
            |a| a.id().short(),
        ),
    }
}

/// Resolve a user argument (id, login or name) to exactly one user
pub fn resolve_user(service: &UserService<'_>, query: &str) -> LedgerResult<User> {
    match service.search(query) {
        SearchOutcome::NoQuery => Err(LedgerError::Validation("User cannot be empty".into())),
        SearchOutcome::NoMatch => Err(LedgerError::user_not_found(query)),
        SearchOutcome::Matches(found) => {
            pick_one(found, query, "user", User::full_name, |u| {
                u.username().to_string()
            })
        }
    }
}

fn pick_one<T>(
    mut found: Vec<T>,
    query: &str,
    kind: &str,
    name_of: impl Fn(&T) -> String,
    tag_of: impl Fn(&T) -> String,
) -> LedgerResult<T> {
    if found.len() == 1 {
        return Ok(found.remove(0));
    }

    let query = query.trim();
    let mut exact: Vec<usize> = (0..found.len())
        .filter(|&i| name_of(&found[i]).eq_ignore_ascii_case(query))
        .collect();
    if exact.len() == 1 {
        return Ok(found.swap_remove(exact.remove(0)));
    }

    let candidates: Vec<String> = found
        .iter()
        .map(|candidate| format!("{} [{}]", name_of(candidate), tag_of(candidate)))
        .collect();
    Err(LedgerError::Validation(format!(
        "'{}' matches more than one {}: {}. Use the ID instead",
        query,
        kind,
        candidates.join(", ")
    )))
}
