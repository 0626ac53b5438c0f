//! User repository for JSON storage
//!
//! One `<id>.json` file per user. Username and e-mail uniqueness is
//! enforced here, under the write lock, rather than by the entity.

use std::collections::HashMap;
use std::path::PathBuf;

use parking_lot::RwLock;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{User, UserId};

use super::file_io::{entity_path, load_entities, write_json_atomic};
use super::search::{rank_by_name, SearchOutcome};

/// Repository for user persistence
pub struct UserStore {
    dir: PathBuf,
    users: RwLock<HashMap<UserId, User>>,
}

impl UserStore {
    /// Load every user file in `dir`, seeding it when it holds none
    pub fn load(
        dir: impl Into<PathBuf>,
        seed: impl FnOnce() -> LedgerResult<Vec<User>>,
    ) -> LedgerResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;

        let loaded = load_entities::<User>(&dir)?;
        let fresh = loaded.is_fresh();

        let mut users = HashMap::new();
        for user in loaded.entities {
            if users.values().any(|known: &User| conflicts(known, &user)) {
                tracing::warn!(user = %user.id(), username = user.username(), "skipping duplicate user");
                continue;
            }
            users.insert(user.id(), user);
        }

        let store = Self {
            dir,
            users: RwLock::new(users),
        };

        if fresh {
            for user in seed()? {
                store.insert(user)?;
            }
            tracing::info!(count = store.count(), "seeded default users");
        }

        Ok(store)
    }

    pub fn get(&self, id: UserId) -> Option<User> {
        self.users.read().get(&id).cloned()
    }

    /// Exact lookup by username or e-mail
    pub fn get_by_login(&self, login: &str) -> Option<User> {
        self.users
            .read()
            .values()
            .find(|user| user.matches_login(login))
            .cloned()
    }

    /// Find users by id, then exact login, then fuzzy full name
    pub fn search(&self, query: &str, threshold: f64) -> SearchOutcome<User> {
        let query = query.trim();
        if query.is_empty() {
            return SearchOutcome::NoQuery;
        }

        if let Ok(id) = UserId::parse(query) {
            return SearchOutcome::from_matches(self.get(id).into_iter().collect());
        }

        if let Some(user) = self.get_by_login(query) {
            return SearchOutcome::Matches(vec![user]);
        }

        SearchOutcome::from_matches(rank_by_name(self.all(), query, threshold, User::full_name))
    }

    /// Persist and register a new user
    pub fn insert(&self, user: User) -> LedgerResult<()> {
        let mut users = self.users.write();

        if let Some(existing) = users.values().find(|known| conflicts(known, &user)) {
            let identifier = if existing.username() == user.username() {
                user.username().to_string()
            } else {
                user.email().to_string()
            };
            return Err(LedgerError::Duplicate {
                entity_type: "User",
                identifier,
            });
        }
        if users.contains_key(&user.id()) {
            return Err(LedgerError::Duplicate {
                entity_type: "User",
                identifier: user.id().to_string(),
            });
        }

        write_json_atomic(entity_path(&self.dir, user.id()), &user)?;
        users.insert(user.id(), user);
        Ok(())
    }

    /// Apply `f` to one user and persist the result; nothing changes on failure
    pub fn update<T>(&self, id: UserId, f: impl FnOnce(&mut User) -> T) -> LedgerResult<T> {
        let mut users = self.users.write();
        let current = users
            .get(&id)
            .ok_or_else(|| LedgerError::user_not_found(id.to_string()))?;

        let mut next = current.clone();
        let out = f(&mut next);
        write_json_atomic(entity_path(&self.dir, id), &next)?;
        users.insert(id, next);
        Ok(out)
    }

    /// Write the in-memory state of one user to its file
    pub fn save(&self, id: UserId) -> LedgerResult<()> {
        let users = self.users.read();
        let user = users
            .get(&id)
            .ok_or_else(|| LedgerError::user_not_found(id.to_string()))?;
        write_json_atomic(entity_path(&self.dir, id), user)
    }

    /// All users ordered by username
    pub fn all(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.read().values().cloned().collect();
        users.sort_by(|a, b| a.username().cmp(b.username()));
        users
    }

    pub fn count(&self) -> usize {
        self.users.read().len()
    }
}

fn conflicts(known: &User, candidate: &User) -> bool {
    known.id() != candidate.id()
        && (known.username() == candidate.username()
            || known.email().eq_ignore_ascii_case(candidate.email()))
}
