//! User Registry
//!
//! Records who has started a conversation with the service. Registration is
//! idempotent: a known id keeps its original name and timestamp.
//!
//! `MemoryUserRegistry` forgets everything on restart; deployments use
//! [`SqliteUserRegistry`](crate::SqliteUserRegistry).

use std::collections::HashSet;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};

/// Shown when the listing is requested by anyone but the admin
pub const ACCESS_DENIED: &str = "شما اجازه‌ی دسترسی به این دستور را ندارید.";

/// Shown when nobody has registered yet
pub const NO_USERS: &str = "هنوز هیچ کاربری ثبت نشده است.";

const LIST_TITLE: &str = "لیست کاربران ربات";

/// A registered user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredUser {
    /// Chat-platform user id
    pub telegram_id: i64,

    /// First name as given at registration
    pub first_name: String,

    /// First registration time
    pub registered_at: DateTime<Utc>,
}

impl RegisteredUser {
    pub fn new(telegram_id: i64, first_name: impl Into<String>) -> Self {
        Self {
            telegram_id,
            first_name: first_name.into(),
            registered_at: Utc::now(),
        }
    }
}

/// User storage trait
pub trait UserRegistry: Send + Sync {
    /// Register a user; `true` when newly added, `false` when already known
    fn register(&self, telegram_id: i64, first_name: &str) -> Result<bool>;

    /// All users, newest first
    fn list(&self) -> Result<Vec<RegisteredUser>>;

    /// Number of registered users
    fn len(&self) -> Result<usize>;

    /// Whether nobody has registered
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[derive(Default)]
struct Users {
    /// Registration order, oldest first
    entries: Vec<RegisteredUser>,
    ids: HashSet<i64>,
}

/// In-memory user registry (for development and tests)
#[derive(Default)]
pub struct MemoryUserRegistry {
    users: RwLock<Users>,
}

impl MemoryUserRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> RegistryError {
    RegistryError::Storage("user registry lock poisoned".into())
}

impl UserRegistry for MemoryUserRegistry {
    fn register(&self, telegram_id: i64, first_name: &str) -> Result<bool> {
        let mut users = self.users.write().map_err(poisoned)?;

        if !users.ids.insert(telegram_id) {
            return Ok(false);
        }

        users.entries.push(RegisteredUser::new(telegram_id, first_name));
        tracing::info!(telegram_id, total = users.entries.len(), "User registered");
        Ok(true)
    }

    fn list(&self) -> Result<Vec<RegisteredUser>> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.entries.iter().rev().cloned().collect())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.users.read().map_err(poisoned)?.entries.len())
    }
}

/// Whether `caller` may see the user listing
pub fn is_admin(caller: Option<i64>, admin_id: i64) -> bool {
    caller == Some(admin_id)
}

/// Render the admin listing, numbered from 1 in the given order
pub fn format_user_list(users: &[RegisteredUser]) -> String {
    if users.is_empty() {
        return NO_USERS.to_string();
    }

    let mut text = format!("--- **{LIST_TITLE}** ---\n\n");
    for (i, user) in users.iter().enumerate() {
        text.push_str(&format!(
            "{}. نام: {} | آیدی: `{}`\n",
            i + 1,
            user.first_name,
            user.telegram_id
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_is_idempotent() {
        let registry = MemoryUserRegistry::new();
        assert!(registry.register(42, "Sara").unwrap());
        assert!(!registry.register(42, "Someone Else").unwrap());

        let users = registry.list().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].first_name, "Sara");
    }

    #[test]
    fn lists_newest_first() {
        let registry = MemoryUserRegistry::new();
        registry.register(1, "Ali").unwrap();
        registry.register(2, "Reza").unwrap();
        registry.register(3, "Mina").unwrap();
        registry.register(1, "Ali").unwrap();

        let ids: Vec<i64> = registry.list().unwrap().iter().map(|u| u.telegram_id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn starts_empty() {
        let registry = MemoryUserRegistry::new();
        assert!(registry.is_empty().unwrap());
        assert_eq!(format_user_list(&registry.list().unwrap()), NO_USERS);
    }

    #[test]
    fn admin_check() {
        assert!(is_admin(Some(99), 99));
        assert!(!is_admin(Some(98), 99));
        assert!(!is_admin(None, 99));
    }

    #[test]
    fn formats_listing() {
        let users = vec![
            RegisteredUser::new(2, "Reza"),
            RegisteredUser::new(1, "Ali"),
        ];
        assert_eq!(
            format_user_list(&users),
            "--- **لیست کاربران ربات** ---\n\n1. نام: Reza | آیدی: `2`\n2. نام: Ali | آیدی: `1`\n"
        );
        assert_eq!(format_user_list(&[]), NO_USERS);
    }

    #[test]
    fn user_serializes_with_timestamp() {
        let user = RegisteredUser::new(5, "Nika");
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["telegram_id"], 5);
        assert_eq!(json["first_name"], "Nika");
        assert!(json["registered_at"].is_string());
    }
}
