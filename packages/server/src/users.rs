use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use engine::Identity;
use tracing::info;

use crate::error::AppError;
use crate::utils::hash;

/// A registered user.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub enabled: bool,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// In-memory user registry, keyed by username with an ID index.
///
/// Registration is atomic per username via the map entry, so two racing
/// registrations for the same name cannot both succeed.
pub struct UserDirectory {
    by_name: DashMap<String, User>,
    names_by_id: DashMap<i64, String>,
    ids: AtomicI64,
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl UserDirectory {
    pub fn new() -> Self {
        Self {
            by_name: DashMap::new(),
            names_by_id: DashMap::new(),
            ids: AtomicI64::new(1),
        }
    }

    pub fn register(
        &self,
        username: &str,
        password: &str,
        nickname: Option<String>,
        email: Option<String>,
    ) -> Result<User, AppError> {
        let password_hash = hash::hash_password(password)
            .map_err(|e| AppError::Internal(format!("Password hash error: {e}")))?;

        match self.by_name.entry(username.to_string()) {
            Entry::Occupied(_) => Err(AppError::UsernameTaken),
            Entry::Vacant(vacant) => {
                let user = User {
                    id: self.ids.fetch_add(1, Ordering::Relaxed),
                    username: username.to_string(),
                    nickname,
                    email,
                    enabled: true,
                    password_hash,
                    created_at: Utc::now(),
                };
                self.names_by_id.insert(user.id, user.username.clone());
                let user = vacant.insert(user).clone();
                info!(user_id = user.id, username, "user registered");
                Ok(user)
            }
        }
    }

    /// Check credentials and account status, returning the user on success.
    pub fn verify_login(&self, username: &str, password: &str) -> Result<User, AppError> {
        let user = self
            .by_name
            .get(username)
            .map(|u| u.clone())
            .ok_or(AppError::InvalidCredentials)?;

        let valid = hash::verify_password(password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verify error: {e}")))?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }
        if !user.enabled {
            return Err(AppError::UserDisabled);
        }
        Ok(user)
    }

    pub fn by_id(&self, user_id: i64) -> Option<User> {
        // Drop the index guard before touching the name map; writers lock
        // the two maps in the opposite order.
        let name = self.names_by_id.get(&user_id)?.value().clone();
        self.by_name.get(&name).map(|u| u.clone())
    }
}

impl Identity for UserDirectory {
    fn resolve_username(&self, user_id: i64) -> String {
        self.names_by_id
            .get(&user_id)
            .map(|name| name.clone())
            .unwrap_or_else(|| format!("user-{user_id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_login() {
        let users = UserDirectory::new();
        let user = users
            .register("alice", "pass12345", Some("Alice".into()), None)
            .unwrap();
        assert_eq!(user.id, 1);

        let logged_in = users.verify_login("alice", "pass12345").unwrap();
        assert_eq!(logged_in.id, user.id);
        assert!(matches!(
            users.verify_login("alice", "wrong"),
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            users.verify_login("nobody", "pass12345"),
            Err(AppError::InvalidCredentials)
        ));
    }

    #[test]
    fn duplicate_usernames_are_rejected() {
        let users = UserDirectory::new();
        users.register("alice", "pass12345", None, None).unwrap();
        assert!(matches!(
            users.register("alice", "other1234", None, None),
            Err(AppError::UsernameTaken)
        ));
    }

    #[test]
    fn usernames_resolve_through_the_identity_contract() {
        let users = UserDirectory::new();
        let user = users.register("bob", "pass12345", None, None).unwrap();
        assert_eq!(users.resolve_username(user.id), "bob");
        assert_eq!(users.resolve_username(999), "user-999");
    }
}
