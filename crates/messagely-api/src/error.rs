use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use messagely_types::api::ErrorResponse;

/// Every handler failure ends up here and leaves as
/// `{"error": {"message", "status"}}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Db(#[from] messagely_db::Error),
    #[error("internal task failure")]
    Join,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        use messagely_db::Error as Db;

        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Db(Db::InvalidCredentials | Db::UsernameTaken) => StatusCode::BAD_REQUEST,
            Self::Db(Db::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Db(Db::Sqlite(_) | Db::Credential(_) | Db::LockPoisoned) | Self::Join => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = ErrorResponse::new(self.to_string(), status.as_u16());
        (status, Json(body)).into_response()
    }
}

/// A required string field; absent and empty are both missing.
pub(crate) fn required(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.is_empty())
}
