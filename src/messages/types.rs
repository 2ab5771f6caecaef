use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const USER_PREFIX: &str = "user";
const BOT_PREFIX: &str = "bot";
const ERROR_PREFIX: &str = "error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    User,
    Bot,
}

/// A single chat entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn with_prefix(prefix: &str, sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: format!("{}-{}", prefix, Uuid::new_v4()),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::with_prefix(USER_PREFIX, Sender::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::with_prefix(BOT_PREFIX, Sender::Bot, text)
    }

    /// A bot-side notice reporting a failed flow
    pub fn error(text: impl Into<String>) -> Self {
        Self::with_prefix(ERROR_PREFIX, Sender::Bot, text)
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    pub fn is_error(&self) -> bool {
        self.id
            .strip_prefix(ERROR_PREFIX)
            .is_some_and(|rest| rest.starts_with('-'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_sender_and_prefix() {
        let user = Message::user("merhaba");
        assert_eq!(user.sender, Sender::User);
        assert!(user.id.starts_with("user-"));
        assert!(user.is_user());

        let bot = Message::bot("selam");
        assert_eq!(bot.sender, Sender::Bot);
        assert!(bot.id.starts_with("bot-"));
        assert!(!bot.is_error());

        let err = Message::error("hata");
        assert_eq!(err.sender, Sender::Bot);
        assert!(err.is_error());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Message::user("same");
        let b = Message::user("same");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_serializes_sender_by_name() {
        let json = serde_json::to_value(Message::bot("x")).unwrap();
        assert_eq!(json["sender"], "Bot");
        assert_eq!(json["text"], "x");
    }
}
