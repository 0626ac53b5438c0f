//! Login throttling
//!
//! Consecutive wrong passwords are counted per user. Once the limit is hit
//! the user is locked out for a fixed period; a successful login resets the
//! count. The count and the lock end live in the user file, so they hold
//! across runs of the binary.

use std::time::Duration;

use chrono::{DateTime, Utc};

use super::password::CredentialHasher;
use crate::error::LedgerResult;
use crate::models::{LoginState, User};
use crate::storage::UserStore;

/// Result of a login attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated(User),
    UnknownUser,
    WrongPassword { remaining: u32 },
    LockedOut { retry_after: Duration },
}

/// Enforces the failed-login limit and lockout period
#[derive(Debug, Clone)]
pub struct LoginGuard {
    max_tries: u32,
    timeout: Duration,
}

impl LoginGuard {
    pub fn new(max_tries: u32, timeout: Duration) -> Self {
        Self {
            max_tries: max_tries.max(1),
            timeout,
        }
    }

    /// Check `password` for the user named by `login` (username or e-mail)
    pub fn attempt(
        &self,
        users: &UserStore,
        hasher: &dyn CredentialHasher,
        login: &str,
        password: &str,
    ) -> LedgerResult<LoginOutcome> {
        let Some(user) = users.get_by_login(login) else {
            tracing::debug!(login, "login for unknown user");
            return Ok(LoginOutcome::UnknownUser);
        };

        let now = Utc::now();
        if let Some(until) = user.login_state().locked_at(now) {
            return Ok(locked_out(until, now));
        }

        // Hash verification runs without holding the store lock
        let valid = hasher.verify(password, user.password_hash())?;
        let now = Utc::now();

        if valid {
            let user = if user.login_state().is_clear() {
                user
            } else {
                users.update(user.id(), |u| {
                    *u.login_state_mut() = LoginState::default();
                    u.clone()
                })?
            };
            tracing::info!(user = %user.id(), "login succeeded");
            return Ok(LoginOutcome::Authenticated(user));
        }

        let lock_end = self.lock_end(now);
        let max_tries = self.max_tries;
        let outcome = users.update(user.id(), |u| {
            let state = u.login_state_mut();
            // A concurrent attempt may have locked the user meanwhile
            if let Some(until) = state.locked_at(now) {
                return locked_out(until, now);
            }
            if state.locked_until.is_some() {
                *state = LoginState::default();
            }

            state.failures += 1;
            if state.failures >= max_tries {
                state.failures = 0;
                state.locked_until = Some(lock_end);
                return locked_out(lock_end, now);
            }
            LoginOutcome::WrongPassword {
                remaining: max_tries - state.failures,
            }
        })?;

        match &outcome {
            LoginOutcome::LockedOut { retry_after } => tracing::warn!(
                user = %user.id(),
                retry_after = ?retry_after,
                "too many failed logins, locking out"
            ),
            _ => tracing::warn!(user = %user.id(), "login failed"),
        }
        Ok(outcome)
    }

    fn lock_end(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let millis = i64::try_from(self.timeout.as_millis()).unwrap_or(i64::MAX);
        now.checked_add_signed(chrono::Duration::milliseconds(millis))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

fn locked_out(until: DateTime<Utc>, now: DateTime<Utc>) -> LoginOutcome {
    LoginOutcome::LockedOut {
        retry_after: (until - now).to_std().unwrap_or_default(),
    }
}
