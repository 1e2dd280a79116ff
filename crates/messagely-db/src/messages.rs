use std::sync::Arc;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use messagely_types::models::{Message, ReceivedMessage, SentMessage};

use crate::{Database, Error, Result};

/// Read side of messages, each enriched with the other party's profile.
/// Results are ordered by `sent_at`, then `id`.
#[derive(Clone)]
pub struct MessageRepository {
    db: Arc<Database>,
}

impl MessageRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn messages_from(&self, username: &str) -> Result<Vec<SentMessage>> {
        let rows = self.db.messages_from(username)?;
        Ok(rows
            .into_iter()
            .map(|row| SentMessage::from(Message::from(row)))
            .collect())
    }

    pub fn messages_to(&self, username: &str) -> Result<Vec<ReceivedMessage>> {
        let rows = self.db.messages_to(username)?;
        Ok(rows
            .into_iter()
            .map(|row| ReceivedMessage::from(Message::from(row)))
            .collect())
    }

    pub fn create(&self, from_username: &str, to_username: &str, body: &str) -> Result<Message> {
        let id = Uuid::new_v4();
        self.db
            .insert_message(id, from_username, to_username, body, Utc::now())?;

        debug!("Message {} from {} to {}", id, from_username, to_username);
        self.get(id)
    }

    pub fn get(&self, id: Uuid) -> Result<Message> {
        self.db
            .get_message(id)?
            .map(Into::into)
            .ok_or_else(Error::message_not_found)
    }

    /// The first call stamps `read_at`; later calls keep that stamp.
    pub fn mark_read(&self, id: Uuid) -> Result<Message> {
        if !self.db.mark_message_read(id, Utc::now())? {
            return Err(Error::message_not_found());
        }
        self.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRow;
    use chrono::{DateTime, Duration};

    fn setup() -> (Arc<Database>, MessageRepository) {
        let db = Arc::new(Database::open_in_memory().unwrap());
        for (username, first, phone) in [
            ("alice", "Alice", "555-0001"),
            ("bob", "Bob", "555-0002"),
            ("carol", "Carol", "555-0003"),
        ] {
            let row = UserRow {
                username: username.into(),
                first_name: Some(first.into()),
                last_name: Some("Test".into()),
                phone: Some(phone.into()),
                join_at: Utc::now(),
                last_login_at: None,
            };
            db.insert_user(&row, "$argon2id$unused").unwrap();
        }
        let repo = MessageRepository::new(db.clone());
        (db, repo)
    }

    fn insert_at(db: &Database, from: &str, to: &str, body: &str, at: DateTime<Utc>) -> Uuid {
        let id = Uuid::new_v4();
        db.insert_message(id, from, to, body, at).unwrap();
        id
    }

    #[test]
    fn messages_from_selects_sender_and_embeds_recipient() {
        let (db, repo) = setup();
        let t0 = Utc::now();
        let m1 = insert_at(&db, "alice", "bob", "hi bob", t0);
        let m2 = insert_at(&db, "alice", "carol", "hi carol", t0 + Duration::seconds(1));
        insert_at(&db, "bob", "alice", "hi alice", t0 + Duration::seconds(2));

        let sent = repo.messages_from("alice").unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].id, m1);
        assert_eq!(sent[0].body, "hi bob");
        assert_eq!(sent[0].to_user.username, "bob");
        assert_eq!(sent[0].to_user.first_name.as_deref(), Some("Bob"));
        assert_eq!(sent[0].to_user.phone.as_deref(), Some("555-0002"));
        assert_eq!(sent[0].sent_at, t0);
        assert!(sent[0].read_at.is_none());
        assert_eq!(sent[1].id, m2);
        assert_eq!(sent[1].to_user.username, "carol");
    }

    #[test]
    fn messages_to_is_the_mirror() {
        let (db, repo) = setup();
        let t0 = Utc::now();
        let later = insert_at(&db, "carol", "alice", "second", t0 + Duration::seconds(5));
        let earlier = insert_at(&db, "bob", "alice", "first", t0);
        insert_at(&db, "alice", "bob", "outgoing", t0);

        let received = repo.messages_to("alice").unwrap();
        let ids: Vec<_> = received.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![earlier, later]);
        assert_eq!(received[0].from_user.username, "bob");
        assert_eq!(received[1].from_user.first_name.as_deref(), Some("Carol"));

        let to_bob = repo.messages_to("bob").unwrap();
        assert_eq!(to_bob.len(), 1);
        assert_eq!(to_bob[0].from_user.username, "alice");
    }

    #[test]
    fn unknown_user_has_no_messages() {
        let (_db, repo) = setup();
        assert!(repo.messages_from("nobody").unwrap().is_empty());
        assert!(repo.messages_to("nobody").unwrap().is_empty());
    }

    #[test]
    fn create_then_get() {
        let (_db, repo) = setup();
        let msg = repo.create("alice", "bob", "hello").unwrap();

        assert_eq!(msg.from_user.username, "alice");
        assert_eq!(msg.to_user.username, "bob");
        assert_eq!(msg.body, "hello");
        assert!(msg.read_at.is_none());
        assert_eq!(repo.get(msg.id).unwrap(), msg);
    }

    #[test]
    fn create_rejects_unknown_users() {
        let (_db, repo) = setup();
        assert!(matches!(
            repo.create("alice", "nobody", "hello"),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            repo.create("nobody", "alice", "hello"),
            Err(Error::NotFound(_))
        ));
        assert!(repo.messages_from("alice").unwrap().is_empty());
        assert!(repo.messages_to("alice").unwrap().is_empty());
    }

    #[test]
    fn mark_read_stamps_once() {
        let (_db, repo) = setup();
        let msg = repo.create("alice", "bob", "hello").unwrap();

        let first = repo.mark_read(msg.id).unwrap().read_at.unwrap();
        assert!(first >= msg.sent_at);
        let again = repo.mark_read(msg.id).unwrap().read_at.unwrap();
        assert_eq!(first, again);

        assert_eq!(repo.messages_to("bob").unwrap()[0].read_at, Some(first));
    }

    #[test]
    fn unknown_message_is_not_found() {
        let (_db, repo) = setup();
        let id = Uuid::new_v4();
        assert!(matches!(repo.get(id), Err(Error::NotFound(_))));
        assert!(matches!(repo.mark_read(id), Err(Error::NotFound(_))));
    }
}
