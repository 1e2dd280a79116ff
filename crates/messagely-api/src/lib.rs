pub mod auth;
pub mod error;
pub mod messages;
pub mod users;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tracing::error;

use messagely_crypto::CredentialStore;
use messagely_db::{Database, MessageRepository, UserRepository};

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub users: UserRepository,
    pub messages: MessageRepository,
}

impl AppStateInner {
    pub fn new(db: Arc<Database>, credentials: CredentialStore) -> AppState {
        Arc::new(Self {
            users: UserRepository::new(db.clone(), credentials),
            messages: MessageRepository::new(db),
        })
    }
}

/// All routes, unlayered. The binary adds CORS and tracing on top.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(auth::index))
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/users", get(users::list_users))
        .route("/users/{username}", get(users::get_user))
        .route("/users/{username}/from", get(users::messages_from))
        .route("/users/{username}/to", get(users::messages_to))
        .route("/messages", post(messages::send_message))
        .route("/messages/{id}", get(messages::get_message))
        .route("/messages/{id}/read", post(messages::mark_read))
        .with_state(state)
}

/// Run store work (SQLite, Argon2) off the async runtime.
pub(crate) async fn run_blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> messagely_db::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Join
        })?
        .map_err(ApiError::from)
}
