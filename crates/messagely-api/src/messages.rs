use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use messagely_types::api::{MessageResponse, SendMessageRequest};

use crate::error::{ApiError, required};
use crate::{AppState, run_blocking};

/// POST /messages — store one message between two existing users.
pub async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let (Some(from), Some(to), Some(body)) = (
        required(req.from_username),
        required(req.to_username),
        required(req.body),
    ) else {
        return Err(ApiError::Validation(
            "from_username, to_username and body required".into(),
        ));
    };

    let messages = state.messages.clone();
    let message = run_blocking(move || messages.create(&from, &to, &body)).await?;

    Ok((StatusCode::CREATED, Json(MessageResponse { message })))
}

pub async fn get_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let messages = state.messages.clone();
    let message = run_blocking(move || messages.get(id)).await?;
    Ok(Json(MessageResponse { message }))
}

/// POST /messages/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let messages = state.messages.clone();
    let message = run_blocking(move || messages.mark_read(id)).await?;
    Ok(Json(MessageResponse { message }))
}

/// An id that cannot name a message is simply not found.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| messagely_db::Error::message_not_found().into())
}
