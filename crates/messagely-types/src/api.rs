use serde::{Deserialize, Serialize};

use crate::models::{Message, ReceivedMessage, SentMessage, User, UserSummary};

// -- Auth --

/// Fields are optional so a missing one surfaces as a validation error with
/// the usual error body instead of a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub username: String,
}

// -- Users --

#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<UserSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SentMessagesResponse {
    pub messages: Vec<SentMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReceivedMessagesResponse {
    pub messages: Vec<ReceivedMessage>,
}

// -- Messages --

#[derive(Debug, Default, Deserialize)]
pub struct SendMessageRequest {
    pub from_username: Option<String>,
    pub to_username: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: Message,
}

// -- Errors --

/// `{"error": {"message": ..., "status": ...}}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub status: u16,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, status: u16) -> Self {
        Self {
            error: ErrorBody {
                message: message.into(),
                status,
            },
        }
    }
}
