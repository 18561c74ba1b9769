use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Title every session starts with until its first message names it
pub const PLACEHOLDER_TITLE: &str = "New chat";

/// Number of characters of the first message kept as the derived title
pub const TITLE_MAX_CHARS: usize = 30;

/// Identifier of a session
pub type SessionId = String;

/// Identifier of a message
pub type MessageId = String;

/// Generate a new unique, time-sortable identifier
pub fn new_id() -> String {
    Ulid::new().to_string()
}

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Typed by the person at the keyboard
    User,
    /// Produced by the chat backend
    #[serde(alias = "ai")]
    Assistant,
}

impl Role {
    /// Short label used in transcripts and terminal output
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "AI",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Set while an assistant message waits for its backend reply
    #[serde(default, alias = "loading")]
    pub pending: bool,
}

impl Message {
    /// Create a message stamped with a fresh id and the current time
    pub fn new(role: Role, content: impl Into<String>, pending: bool) -> Self {
        Self {
            id: new_id(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            pending,
        }
    }
}

/// One conversation thread
///
/// Messages are kept in append order, which is also chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    pub created: DateTime<Utc>,
}

impl Session {
    /// Create an empty session carrying the placeholder title
    pub fn new() -> Self {
        Self {
            id: new_id(),
            title: PLACEHOLDER_TITLE.to_string(),
            messages: Vec::new(),
            created: Utc::now(),
        }
    }

    /// Whether the title still awaits derivation
    pub fn has_placeholder_title(&self) -> bool {
        self.title == PLACEHOLDER_TITLE
    }

    /// Replace the placeholder title with a prefix of the first message
    ///
    /// Returns `true` only when the title changed. Once derived the title is
    /// never touched again, so repeated calls are no-ops.
    pub fn derive_title(&mut self) -> bool {
        if !self.has_placeholder_title() {
            return false;
        }
        let Some(first) = self.messages.first() else {
            return false;
        };
        let derived = truncate_chars(&first.content, TITLE_MAX_CHARS);
        if derived == PLACEHOLDER_TITLE {
            return false;
        }
        self.title = derived;
        true
    }

    /// Last message in the session, if any
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Find a message by id
    pub fn message_mut(&mut self, id: &str) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == id)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep at most `max` characters of `text` without splitting a character
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_has_placeholder_and_no_messages() {
        let session = Session::new();
        assert_eq!(session.title, PLACEHOLDER_TITLE);
        assert!(session.messages.is_empty());
        assert_eq!(session.id.len(), 26);
    }

    #[test]
    fn test_new_ids_are_unique() {
        assert_ne!(new_id(), new_id());
    }

    #[test]
    fn test_derive_title_requires_a_message() {
        let mut session = Session::new();
        assert!(!session.derive_title());
        assert_eq!(session.title, PLACEHOLDER_TITLE);
    }

    #[test]
    fn test_derive_title_truncates_first_message() {
        let mut session = Session::new();
        session.messages.push(Message::new(
            Role::User,
            "a question that is clearly longer than thirty characters",
            false,
        ));
        assert!(session.derive_title());
        assert_eq!(session.title, "a question that is clearly lon");
        assert_eq!(session.title.chars().count(), TITLE_MAX_CHARS);
    }

    #[test]
    fn test_derive_title_is_idempotent_and_sticky() {
        let mut session = Session::new();
        session
            .messages
            .push(Message::new(Role::User, "hello", false));
        assert!(session.derive_title());
        assert!(!session.derive_title());

        session.messages.insert(0, Message::new(Role::User, "other", false));
        assert!(!session.derive_title());
        assert_eq!(session.title, "hello");
    }

    #[test]
    fn test_truncate_chars_respects_multibyte_boundaries() {
        assert_eq!(truncate_chars("привет мир", 6), "привет");
        assert_eq!(truncate_chars("short", 30), "short");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_legacy_field_names_deserialize() {
        let json = r#"{
            "id": "1700000000000",
            "role": "ai",
            "content": " ",
            "timestamp": "2024-01-01T10:00:00Z",
            "loading": true
        }"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.role, Role::Assistant);
        assert!(message.pending);
    }

    #[test]
    fn test_role_labels() {
        assert_eq!(Role::User.label(), "You");
        assert_eq!(Role::Assistant.label(), "AI");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }
}
