use axum::{Json, extract::State, extract::rejection::JsonRejection, response::IntoResponse};
use tracing::info;

use messagely_types::api::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use messagely_types::models::NewUser;

use crate::error::{ApiError, required};
use crate::{AppState, run_blocking};

const CREDENTIALS_REQUIRED: &str = "Username and password required";

pub async fn index() -> &'static str {
    "APP IS WORKING!!"
}

/// POST /login — check credentials and stamp `last_login_at`.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let (Some(username), Some(password)) = (required(req.username), required(req.password))
    else {
        return Err(ApiError::Validation(CREDENTIALS_REQUIRED.into()));
    };

    let users = state.users.clone();
    let name = username.clone();
    run_blocking(move || {
        users.authenticate(&name, &password)?;
        users.update_login_timestamp(&name)
    })
    .await?;

    info!("User {} logged in", username);
    Ok(Json(LoginResponse {
        message: "Logged in!".into(),
    }))
}

/// POST /register — create the user and log them in.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let (Some(username), Some(password)) = (required(req.username), required(req.password))
    else {
        return Err(ApiError::Validation(CREDENTIALS_REQUIRED.into()));
    };

    let new_user = NewUser {
        username,
        password,
        first_name: req.first_name,
        last_name: req.last_name,
        phone: req.phone,
    };

    let users = state.users.clone();
    let user = run_blocking(move || {
        let user = users.register(new_user)?;
        users.update_login_timestamp(&user.username)?;
        Ok(user)
    })
    .await?;

    Ok(Json(RegisterResponse {
        username: user.username,
    }))
}
