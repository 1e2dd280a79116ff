use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use messagely_crypto::CredentialStore;
use messagely_types::models::{NewUser, User, UserSummary};

use crate::models::UserRow;
use crate::{Database, Error, Result};

#[derive(Clone)]
pub struct UserRepository {
    db: Arc<Database>,
    credentials: CredentialStore,
}

impl UserRepository {
    pub fn new(db: Arc<Database>, credentials: CredentialStore) -> Self {
        Self { db, credentials }
    }

    /// Hash the password and insert the user. `last_login_at` starts empty.
    pub fn register(&self, new_user: NewUser) -> Result<User> {
        let password_hash = self.credentials.hash(&new_user.password)?;

        let row = UserRow {
            username: new_user.username,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            phone: new_user.phone,
            join_at: Utc::now(),
            last_login_at: None,
        };
        self.db.insert_user(&row, &password_hash)?;

        info!("Registered user {}", row.username);
        Ok(row.into())
    }

    /// Check a username/password pair. Never says which half was wrong.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<bool> {
        let Some(hash) = self.db.get_password_hash(username)? else {
            self.credentials.verify_dummy(password);
            warn!("Login failed for {}", username);
            return Err(Error::InvalidCredentials);
        };

        if self.credentials.verify(password, &hash)? {
            Ok(true)
        } else {
            warn!("Login failed for {}", username);
            Err(Error::InvalidCredentials)
        }
    }

    pub fn update_login_timestamp(&self, username: &str) -> Result<()> {
        if !self.db.set_last_login(username, Utc::now())? {
            return Err(Error::user_not_found());
        }
        Ok(())
    }

    pub fn all(&self) -> Result<Vec<UserSummary>> {
        let rows = self.db.list_users()?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub fn get(&self, username: &str) -> Result<User> {
        self.db
            .get_user(username)?
            .map(Into::into)
            .ok_or_else(Error::user_not_found)
    }
}
