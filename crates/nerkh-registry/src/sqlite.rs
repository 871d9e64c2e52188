//! SQLite User Registry
//!
//! Durable store for registered users. One row per telegram id; a repeated
//! registration is ignored by the unique constraint.

use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::Connection;

use crate::error::{RegistryError, Result};
use crate::user::{RegisteredUser, UserRegistry};

const USERS_TABLE_DDL: &str = "\
CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    telegram_id   INTEGER NOT NULL UNIQUE,
    first_name    TEXT    NOT NULL,
    registered_at TEXT    NOT NULL
);";

/// SQLite-backed user registry
pub struct SqliteUserRegistry {
    conn: Mutex<Connection>,
}

impl SqliteUserRegistry {
    /// Open (or create) the database file and ensure the schema exists
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch(USERS_TABLE_DDL)?;
        tracing::info!(path = %path.as_ref().display(), "User registry opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database with the schema applied
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(USERS_TABLE_DDL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| RegistryError::Storage("user registry lock poisoned".into()))
    }
}

impl UserRegistry for SqliteUserRegistry {
    fn register(&self, telegram_id: i64, first_name: &str) -> Result<bool> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT INTO users (telegram_id, first_name, registered_at) \
             VALUES (?1, ?2, ?3) \
             ON CONFLICT(telegram_id) DO NOTHING",
            rusqlite::params![telegram_id, first_name, Utc::now()],
        )?;

        if inserted > 0 {
            tracing::info!(telegram_id, "User registered");
        }
        Ok(inserted > 0)
    }

    fn list(&self) -> Result<Vec<RegisteredUser>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT telegram_id, first_name, registered_at FROM users ORDER BY id DESC",
        )?;

        let users = stmt
            .query_map([], |row| {
                Ok(RegisteredUser {
                    telegram_id: row.get(0)?,
                    first_name: row.get(1)?,
                    registered_at: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(users)
    }

    fn len(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        usize::try_from(count).map_err(|e| RegistryError::Storage(format!("bad user count: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::format_user_list;

    #[test]
    fn registration_is_idempotent() {
        let registry = SqliteUserRegistry::open_in_memory().unwrap();
        assert!(registry.register(42, "Sara").unwrap());
        assert!(!registry.register(42, "Someone Else").unwrap());

        let users = registry.list().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].first_name, "Sara");
        assert_eq!(registry.len().unwrap(), 1);
    }

    #[test]
    fn lists_newest_first() {
        let registry = SqliteUserRegistry::open_in_memory().unwrap();
        assert!(registry.is_empty().unwrap());
        for (id, name) in [(1, "Ali"), (2, "Reza"), (3, "Mina")] {
            registry.register(id, name).unwrap();
        }
        registry.register(1, "Ali").unwrap();

        let users = registry.list().unwrap();
        let ids: Vec<i64> = users.iter().map(|u| u.telegram_id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert!(format_user_list(&users).starts_with("--- **لیست کاربران ربات** ---\n\n1. نام: Mina"));
    }

    #[test]
    fn users_survive_reopen() {
        let path = std::env::temp_dir().join(format!("nerkh-users-{}.db", std::process::id()));
        std::fs::remove_file(&path).ok();

        {
            let registry = SqliteUserRegistry::open(&path).unwrap();
            registry.register(7, "Nika").unwrap();
        }

        let registry = SqliteUserRegistry::open(&path).unwrap();
        assert!(!registry.register(7, "Nika").unwrap());
        let users = registry.list().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].telegram_id, 7);
        assert!(users[0].registered_at <= Utc::now());

        drop(registry);
        std::fs::remove_file(&path).ok();
    }
}
