//! User model
//!
//! Users hold credentials and preferences. Accounts refer to users by id;
//! the accounts a user can reach are computed from the account store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::UserId;
use super::timestamp_now;

/// Per-user presentation preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Locale tag such as `en` or `cs`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

/// Consecutive failed logins and any lockout in force.
///
/// Kept in the user file so throttling holds across separate runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginState {
    #[serde(default)]
    pub failures: u32,

    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub locked_until: Option<DateTime<Utc>>,
}

impl LoginState {
    pub fn is_clear(&self) -> bool {
        self.failures == 0 && self.locked_until.is_none()
    }

    /// The lock end, if it is still in the future at `now`
    pub fn locked_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.locked_until.filter(|until| *until > now)
    }
}

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: String,
    email: String,
    name: String,
    last_name: String,

    /// PHC-formatted password hash
    password: String,

    #[serde(with = "chrono::serde::ts_seconds")]
    created_at: DateTime<Utc>,

    #[serde(default)]
    admin: bool,

    #[serde(default)]
    preferences: UserPreferences,

    #[serde(default, skip_serializing_if = "LoginState::is_clear")]
    login: LoginState,
}

impl User {
    /// Create a user from an already hashed password
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
        last_name: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: UserId::new(),
            username: username.into().trim().to_string(),
            email: email.into().trim().to_string(),
            name: name.into().trim().to_string(),
            last_name: last_name.into().trim().to_string(),
            password: password_hash.into(),
            created_at: timestamp_now(),
            admin: false,
            preferences: UserPreferences::default(),
            login: LoginState::default(),
        }
    }

    pub fn with_admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn password_hash(&self) -> &str {
        &self.password
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.preferences
    }

    pub fn login_state(&self) -> &LoginState {
        &self.login
    }

    pub fn login_state_mut(&mut self) -> &mut LoginState {
        &mut self.login
    }

    /// "Name LastName", skipping empty parts
    pub fn full_name(&self) -> String {
        [self.name.as_str(), self.last_name.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The stored locale, or `fallback` when none is set
    pub fn preferred_locale<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.preferences.locale.as_deref().unwrap_or(fallback)
    }

    pub fn set_preferred_locale(&mut self, locale: Option<String>) {
        self.preferences.locale = locale
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
    }

    /// Whether `login` names this user by username or e-mail
    pub fn matches_login(&self, login: &str) -> bool {
        let login = login.trim();
        self.username == login || self.email.eq_ignore_ascii_case(login)
    }
}
