use messagely_crypto::CredentialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Unknown user and wrong password share this variant and message.
    #[error("Invalid username/password")]
    InvalidCredentials,
    #[error("Username taken.")]
    UsernameTaken,
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error("database lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn user_not_found() -> Self {
        Self::NotFound("User not found".into())
    }

    pub fn message_not_found() -> Self {
        Self::NotFound("Message not found".into())
    }
}
