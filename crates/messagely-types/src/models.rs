use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Full profile of a registered user. The password hash never leaves the
/// store, so it has no field here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub join_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// The public fields of a user, as listed by `GET /users` and embedded in
/// message results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
        }
    }
}

/// Input to registration. `password` is plaintext and only lives long
/// enough to be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

/// A message with both ends expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub from_user: UserSummary,
    pub to_user: UserSummary,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// A message as seen from its sender's outbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentMessage {
    pub id: Uuid,
    pub to_user: UserSummary,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// A message as seen from its recipient's inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivedMessage {
    pub id: Uuid,
    pub from_user: UserSummary,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl From<Message> for SentMessage {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            to_user: m.to_user,
            body: m.body,
            sent_at: m.sent_at,
            read_at: m.read_at,
        }
    }
}

impl From<Message> for ReceivedMessage {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            from_user: m.from_user,
            body: m.body,
            sent_at: m.sent_at,
            read_at: m.read_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(username: &str) -> UserSummary {
        UserSummary {
            username: username.to_string(),
            first_name: Some("First".into()),
            last_name: None,
            phone: Some("555-0100".into()),
        }
    }

    #[test]
    fn sent_message_keeps_only_recipient() {
        let msg = Message {
            id: Uuid::new_v4(),
            from_user: summary("alice"),
            to_user: summary("bob"),
            body: "hi".into(),
            sent_at: Utc::now(),
            read_at: None,
        };

        let json = serde_json::to_value(SentMessage::from(msg.clone())).unwrap();
        assert_eq!(json["to_user"]["username"], "bob");
        assert!(json.get("from_user").is_none());
        assert_eq!(json["id"], msg.id.to_string());
        assert!(json["read_at"].is_null());

        let json = serde_json::to_value(ReceivedMessage::from(msg)).unwrap();
        assert_eq!(json["from_user"]["username"], "alice");
        assert!(json.get("to_user").is_none());
    }

    #[test]
    fn summary_drops_timestamps() {
        let user = User {
            username: "alice".into(),
            first_name: None,
            last_name: None,
            phone: None,
            join_at: Utc::now(),
            last_login_at: None,
        };
        let json = serde_json::to_value(UserSummary::from(user)).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 4);
    }
}
