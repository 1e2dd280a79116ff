use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use messagely_types::api::{
    ReceivedMessagesResponse, SentMessagesResponse, UserListResponse, UserResponse,
};

use crate::error::ApiError;
use crate::{AppState, run_blocking};

// Any caller may read any user's profile and messages; there is no
// authorization layer in front of these.

pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = state.users.clone();
    let users = run_blocking(move || users.all()).await?;
    Ok(Json(UserListResponse { users }))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.users.clone();
    let user = run_blocking(move || users.get(&username)).await?;
    Ok(Json(UserResponse { user }))
}

pub async fn messages_from(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let messages = state.messages.clone();
    let messages = run_blocking(move || messages.messages_from(&username)).await?;
    Ok(Json(SentMessagesResponse { messages }))
}

pub async fn messages_to(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let messages = state.messages.clone();
    let messages = run_blocking(move || messages.messages_to(&username)).await?;
    Ok(Json(ReceivedMessagesResponse { messages }))
}
