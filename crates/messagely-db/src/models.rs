//! Database row types and the one place each is read out of a result row.
//! Distinct from messagely-types models to keep the DB layer's column
//! layout out of the wire format.

use chrono::{DateTime, Utc};
use rusqlite::Row;
use rusqlite::types::Type;
use uuid::Uuid;

use messagely_types::models::{Message, User, UserSummary};

pub struct UserRow {
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub join_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl UserRow {
    pub const COLUMNS: &'static str =
        "username, first_name, last_name, phone, join_at, last_login_at";

    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            username: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            phone: row.get(3)?,
            join_at: row.get(4)?,
            last_login_at: row.get(5)?,
        })
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            phone: row.phone,
            join_at: row.join_at,
            last_login_at: row.last_login_at,
        }
    }
}

pub struct UserSummaryRow {
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

impl UserSummaryRow {
    pub const COLUMNS: &'static str = "username, first_name, last_name, phone";

    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            username: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            phone: row.get(3)?,
        })
    }
}

impl From<UserSummaryRow> for UserSummary {
    fn from(row: UserSummaryRow) -> Self {
        Self {
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            phone: row.phone,
        }
    }
}

/// A message joined with both its sender and recipient.
pub struct MessageRow {
    pub id: Uuid,
    pub from_user: UserSummaryRow,
    pub to_user: UserSummaryRow,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl MessageRow {
    /// Select list and joins matching `from_row`. Callers append the WHERE
    /// and ORDER BY clauses.
    pub const SELECT: &'static str = "SELECT m.id,
                m.from_username, f.first_name, f.last_name, f.phone,
                m.to_username, t.first_name, t.last_name, t.phone,
                m.body, m.sent_at, m.read_at
         FROM messages AS m
           JOIN users AS f ON m.from_username = f.username
           JOIN users AS t ON m.to_username = t.username";

    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let id: String = row.get(0)?;
        let id = Uuid::parse_str(&id)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;

        Ok(Self {
            id,
            from_user: UserSummaryRow {
                username: row.get(1)?,
                first_name: row.get(2)?,
                last_name: row.get(3)?,
                phone: row.get(4)?,
            },
            to_user: UserSummaryRow {
                username: row.get(5)?,
                first_name: row.get(6)?,
                last_name: row.get(7)?,
                phone: row.get(8)?,
            },
            body: row.get(9)?,
            sent_at: row.get(10)?,
            read_at: row.get(11)?,
        })
    }
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            from_user: row.from_user.into(),
            to_user: row.to_user.into(),
            body: row.body,
            sent_at: row.sent_at,
            read_at: row.read_at,
        }
    }
}
