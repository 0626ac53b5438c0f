//! User service
//!
//! Registration, login and preferences.

use crate::auth::{CredentialHasher, LoginGuard, LoginOutcome};
use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{User, UserId};
use crate::storage::{SearchOutcome, Storage};

/// Service for user management
pub struct UserService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
    hasher: &'a dyn CredentialHasher,
    guard: &'a LoginGuard,
}

impl<'a> UserService<'a> {
    pub fn new(
        storage: &'a Storage,
        settings: &'a Settings,
        hasher: &'a dyn CredentialHasher,
        guard: &'a LoginGuard,
    ) -> Self {
        Self {
            storage,
            settings,
            hasher,
            guard,
        }
    }

    /// Create a user. Username and e-mail must be unused.
    pub fn register(
        &self,
        username: &str,
        email: &str,
        name: &str,
        last_name: &str,
        password: &str,
    ) -> LedgerResult<User> {
        let username = username.trim();
        if username.is_empty() || username.chars().any(char::is_whitespace) {
            return Err(LedgerError::Validation(
                "Username must be a single non-empty word".into(),
            ));
        }
        let email = email.trim();
        if !is_plausible_email(email) {
            return Err(LedgerError::Validation(format!(
                "Invalid e-mail address: {}",
                email
            )));
        }
        if name.trim().is_empty() {
            return Err(LedgerError::Validation("Name cannot be empty".into()));
        }
        if password.is_empty() {
            return Err(LedgerError::Validation("Password cannot be empty".into()));
        }

        let hash = self.hasher.hash(password)?;
        let user = User::new(username, email, name, last_name, hash);
        self.storage.users.insert(user.clone())?;

        tracing::info!(user = %user.id(), username, "user registered");
        Ok(user)
    }

    /// Check credentials, subject to login throttling
    pub fn authenticate(&self, login: &str, password: &str) -> LedgerResult<LoginOutcome> {
        self.guard
            .attempt(&self.storage.users, self.hasher, login, password)
    }

    pub fn get(&self, id: UserId) -> LedgerResult<User> {
        self.storage
            .users
            .get(id)
            .ok_or_else(|| LedgerError::user_not_found(id.to_string()))
    }

    /// Exact lookup by username or e-mail
    pub fn find_by_login(&self, login: &str) -> LedgerResult<User> {
        self.storage
            .users
            .get_by_login(login)
            .ok_or_else(|| LedgerError::user_not_found(login))
    }

    /// Search by id, login or fuzzy full name
    pub fn search(&self, query: &str) -> SearchOutcome<User> {
        self.storage
            .users
            .search(query, self.settings.search_threshold)
    }

    /// Store or clear the user's preferred locale
    pub fn set_preferred_locale(&self, user: UserId, locale: Option<&str>) -> LedgerResult<()> {
        self.storage
            .users
            .update(user, |u| u.set_preferred_locale(locale.map(str::to_string)))
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::Fixture;

    #[test]
    fn test_register_and_login() {
        let fx = Fixture::new();
        let users = fx.users();

        let user = users
            .register("jsmith", "john@example.com", "John", "Smith", "s3cret")
            .unwrap();
        assert_eq!(user.full_name(), "John Smith");
        assert_ne!(user.password_hash(), "s3cret");

        let outcome = users.authenticate("john@example.com", "s3cret").unwrap();
        assert!(matches!(outcome, LoginOutcome::Authenticated(ref u) if u.id() == user.id()));

        let outcome = users.authenticate("jsmith", "nope").unwrap();
        assert!(matches!(outcome, LoginOutcome::WrongPassword { .. }));
    }

    #[test]
    fn test_seeded_admin_can_log_in() {
        let fx = Fixture::new();
        let outcome = fx.users().authenticate("admin", "admin").unwrap();
        assert!(matches!(outcome, LoginOutcome::Authenticated(ref u) if u.is_admin()));
    }

    #[test]
    fn test_register_validation() {
        let fx = Fixture::new();
        let users = fx.users();

        assert!(users
            .register("two words", "a@b.cz", "A", "B", "pw")
            .unwrap_err()
            .is_validation());
        assert!(users
            .register("ab", "not-an-email", "A", "B", "pw")
            .unwrap_err()
            .is_validation());
        assert!(users
            .register("ab", "a@b.cz", "A", "B", "")
            .unwrap_err()
            .is_validation());

        let err = users
            .register("admin", "other@bank.com", "A", "B", "pw")
            .unwrap_err();
        assert!(matches!(err, LedgerError::Duplicate { .. }));
    }

    #[test]
    fn test_search_and_locale() {
        let fx = Fixture::new();
        let users = fx.users();
        let john = users
            .register("jsmith", "john@example.com", "John", "Smith", "pw")
            .unwrap();

        let found = users.search("Jon");
        assert_eq!(found.matches()[0].id(), john.id());
        assert!(users.search("").is_no_query());

        users.set_preferred_locale(john.id(), Some("cs")).unwrap();
        assert_eq!(users.get(john.id()).unwrap().preferred_locale("en"), "cs");
        users.set_preferred_locale(john.id(), None).unwrap();
        assert_eq!(users.get(john.id()).unwrap().preferred_locale("en"), "en");
    }
}
