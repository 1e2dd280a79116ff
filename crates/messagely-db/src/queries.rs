use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, ffi, params};
use uuid::Uuid;

use crate::models::{MessageRow, UserRow, UserSummaryRow};
use crate::{Database, Error, Result};

impl Database {
    // -- Users --

    /// A primary-key collision, including one lost to a concurrent insert,
    /// comes back as `UsernameTaken`.
    pub fn insert_user(&self, user: &UserRow, password_hash: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, password, first_name, last_name, phone, join_at, last_login_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    user.username,
                    password_hash,
                    user.first_name,
                    user.last_name,
                    user.phone,
                    user.join_at,
                    user.last_login_at,
                ],
            )
            .map_err(|e| match constraint_code(&e) {
                Some(ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE) => {
                    Error::UsernameTaken
                }
                _ => e.into(),
            })?;
            Ok(())
        })
    }

    pub fn get_password_hash(&self, username: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            let hash = conn
                .query_row(
                    "SELECT password FROM users WHERE username = ?1",
                    [username],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(hash)
        })
    }

    /// Returns false if no such user.
    pub fn set_last_login(&self, username: &str, at: DateTime<Utc>) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE users SET last_login_at = ?1 WHERE username = ?2",
                params![at, username],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn list_users(&self) -> Result<Vec<UserSummaryRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM users ORDER BY username",
                UserSummaryRow::COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], UserSummaryRow::from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_user(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {} FROM users WHERE username = ?1", UserRow::COLUMNS);
            let row = conn
                .query_row(&sql, [username], UserRow::from_row)
                .optional()?;
            Ok(row)
        })
    }

    // -- Messages --

    /// Either username missing from `users` fails the foreign key and
    /// comes back as a user `NotFound`.
    pub fn insert_message(
        &self,
        id: Uuid,
        from_username: &str,
        to_username: &str,
        body: &str,
        sent_at: DateTime<Utc>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (id, from_username, to_username, body, sent_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id.to_string(), from_username, to_username, body, sent_at],
            )
            .map_err(|e| match constraint_code(&e) {
                Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => Error::user_not_found(),
                _ => e.into(),
            })?;
            Ok(())
        })
    }

    pub fn get_message(&self, id: Uuid) -> Result<Option<MessageRow>> {
        self.with_conn(|conn| {
            let sql = format!("{} WHERE m.id = ?1", MessageRow::SELECT);
            let row = conn
                .query_row(&sql, [id.to_string()], MessageRow::from_row)
                .optional()?;
            Ok(row)
        })
    }

    /// Sets `read_at` unless already set. Returns false if no such message.
    pub fn mark_message_read(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE messages SET read_at = COALESCE(read_at, ?1) WHERE id = ?2",
                params![at, id.to_string()],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn messages_from(&self, username: &str) -> Result<Vec<MessageRow>> {
        self.query_messages("m.from_username", username)
    }

    pub fn messages_to(&self, username: &str) -> Result<Vec<MessageRow>> {
        self.query_messages("m.to_username", username)
    }

    fn query_messages(&self, column: &str, username: &str) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            // Both ends joined in one query (no per-message user lookups)
            let sql = format!(
                "{} WHERE {} = ?1 ORDER BY m.sent_at, m.id",
                MessageRow::SELECT,
                column
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([username], MessageRow::from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

/// Extended result code of a constraint violation, if that is what `e` is.
fn constraint_code(e: &rusqlite::Error) -> Option<i32> {
    match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Some(err.extended_code)
        }
        _ => None,
    }
}
