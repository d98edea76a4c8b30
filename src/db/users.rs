//! User document operations.

use super::Database;
use crate::lifecycle::now_ms;
use anyhow::Result;
use rusqlite::{OptionalExtension, params};

/// Profile fields stored for a user (the task collection lives in the
/// tasks table and is fetched separately).
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub created_at: i64,
}

impl Database {
    /// Create the user document if it does not already exist. Signup is
    /// idempotent: re-registering an existing user is a no-op.
    pub fn create_user(
        &self,
        user_id: &str,
        email: Option<&str>,
        display_name: Option<&str>,
    ) -> Result<bool> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO users (id, email, display_name, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![user_id, email, display_name, now_ms()],
            )?;
            Ok(inserted > 0)
        })
    }

    /// Fetch a user record, or None if no document exists.
    pub fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>> {
        self.with_conn(|conn| {
            let record = conn
                .query_row(
                    "SELECT id, email, display_name, created_at FROM users WHERE id = ?1",
                    params![user_id],
                    |row| {
                        Ok(UserRecord {
                            id: row.get(0)?,
                            email: row.get(1)?,
                            display_name: row.get(2)?,
                            created_at: row.get(3)?,
                        })
                    },
                )
                .optional()?;
            Ok(record)
        })
    }

    /// True when a user document exists.
    pub fn user_exists(&self, user_id: &str) -> Result<bool> {
        Ok(self.get_user(user_id)?.is_some())
    }
}
