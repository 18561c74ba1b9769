//! View synchronizer
//!
//! Pure projections of store state into what the terminal shows. Each
//! render replaces the previous output wholesale.

use crate::session::{truncate_chars, Role, Session, StateObserver};
use std::sync::{Arc, RwLock};

/// Characters of the last message shown in a session preview
pub const PREVIEW_MAX_CHARS: usize = 30;

/// Preview shown for a session without messages
pub const EMPTY_PREVIEW: &str = "Empty";

/// Displayed in place of a pending assistant message
pub const THINKING_TEXT: &str = "Thinking...";

/// Shown instead of a message list when the session has no messages
pub const EMPTY_CHAT_HINT: &str = "Write a message";

/// One row of the session list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionListItem {
    pub id: String,
    pub title: String,
    pub active: bool,
    pub preview: String,
}

/// One rendered message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageItem {
    pub role: Role,
    pub text: String,
}

/// Rendered message area of the active session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageList {
    /// Session has no messages yet
    Empty { hint: String },
    /// Messages in chronological order
    Messages(Vec<MessageItem>),
}

/// Title bar of the active session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub title: String,
    /// Creation date, `DD.MM.YYYY`
    pub created: String,
}

/// Everything visible at once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub sessions: Vec<SessionListItem>,
    pub header: Header,
    pub messages: MessageList,
}

/// Render the session list in store order
pub fn render_session_list(sessions: &[Session], active_id: &str) -> Vec<SessionListItem> {
    sessions
        .iter()
        .map(|session| SessionListItem {
            id: session.id.clone(),
            title: session.title.clone(),
            active: session.id == active_id,
            preview: match session.last_message() {
                Some(last) if last.pending => THINKING_TEXT.to_string(),
                Some(last) => format!("{}...", truncate_chars(&last.content, PREVIEW_MAX_CHARS)),
                None => EMPTY_PREVIEW.to_string(),
            },
        })
        .collect()
}

/// Render a session's messages in append order
pub fn render_message_list(session: &Session) -> MessageList {
    if session.messages.is_empty() {
        return MessageList::Empty {
            hint: EMPTY_CHAT_HINT.to_string(),
        };
    }
    MessageList::Messages(
        session
            .messages
            .iter()
            .map(|message| MessageItem {
                role: message.role,
                text: if message.pending {
                    THINKING_TEXT.to_string()
                } else {
                    message.content.clone()
                },
            })
            .collect(),
    )
}

/// Render the title bar of a session
pub fn render_header(session: &Session) -> Header {
    Header {
        title: session.title.clone(),
        created: session.created.format("%d.%m.%Y").to_string(),
    }
}

/// Build the full frame for the given state
///
/// Returns `None` when `active_id` matches no session.
pub fn render_frame(sessions: &[Session], active_id: &str) -> Option<Frame> {
    let active = sessions.iter().find(|s| s.id == active_id)?;
    Some(Frame {
        sessions: render_session_list(sessions, active_id),
        header: render_header(active),
        messages: render_message_list(active),
    })
}

/// Store observer holding the most recent frame
///
/// Clones share the same frame slot, so one clone can be handed to the
/// store while another is kept for reading.
#[derive(Debug, Clone, Default)]
pub struct ViewSynchronizer {
    frame: Arc<RwLock<Option<Frame>>>,
}

impl ViewSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest rendered frame, if the store has reported any state
    pub fn current(&self) -> Option<Frame> {
        self.frame.read().ok().and_then(|guard| guard.clone())
    }
}

impl StateObserver for ViewSynchronizer {
    fn state_changed(&mut self, sessions: &[Session], active_id: &str) {
        let frame = render_frame(sessions, active_id);
        match self.frame.write() {
            Ok(mut guard) => *guard = frame,
            Err(_) => tracing::warn!("View frame lock poisoned, skipping render"),
        }
    }
}
