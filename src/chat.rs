//! User-facing chat actions
//!
//! [`ChatApp`] wires the session store, the view synchronizer and the chat
//! backend together. Every action mutates the store and then runs the
//! display step, which is where the derived-title rule applies.

use crate::backend::ChatBackend;
use crate::error::Result;
use crate::session::{MessageId, Role, Session, SessionId, SessionStore};
use crate::storage::SessionPersistence;
use crate::view::{
    render_header, render_message_list, render_session_list, Frame, ViewSynchronizer,
};
use std::sync::Arc;

/// Final content of an assistant message whose exchange failed
pub const SEND_FAILURE_TEXT: &str = "Backend unavailable";

/// Default file name for exported chats
pub const EXPORT_FILE_NAME: &str = "cravt-chat.txt";

/// A send that has placed its messages but not yet received a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    /// Placeholder assistant message awaiting the reply
    pub message_id: MessageId,
    /// Text forwarded to the backend
    pub text: String,
}

/// Chat application state
pub struct ChatApp {
    store: SessionStore,
    backend: Arc<dyn ChatBackend>,
    view: ViewSynchronizer,
}

impl ChatApp {
    /// Open the store from `persistence` and attach the view
    pub fn new(persistence: Box<dyn SessionPersistence>, backend: Arc<dyn ChatBackend>) -> Self {
        let view = ViewSynchronizer::new();
        let mut store = SessionStore::open(persistence);
        store.set_observer(Box::new(view.clone()));

        let mut app = Self {
            store,
            backend,
            view,
        };
        app.display();
        app
    }

    /// Read access to the underlying store
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Backend answering this app's messages
    pub fn backend(&self) -> Arc<dyn ChatBackend> {
        Arc::clone(&self.backend)
    }

    /// The active session
    pub fn active_session(&mut self) -> &Session {
        self.store.active_session()
    }

    /// Display the active session and return what is on screen
    pub fn frame(&mut self) -> Frame {
        self.display();
        if let Some(frame) = self.view.current() {
            return frame;
        }
        let active = self.store.active_session().clone();
        Frame {
            sessions: render_session_list(self.store.sessions(), &active.id),
            header: render_header(&active),
            messages: render_message_list(&active),
        }
    }

    /// Start a new conversation
    pub fn new_chat(&mut self) -> SessionId {
        let id = self.store.create_session();
        self.display();
        id
    }

    /// Delete the active conversation if `confirm` agrees
    ///
    /// Returns the removed session id, or `None` when declined.
    pub fn delete_active_chat<F>(&mut self, confirm: F) -> Option<SessionId>
    where
        F: FnOnce(&Session) -> bool,
    {
        if !confirm(self.store.active_session()) {
            tracing::debug!("Chat deletion declined");
            return None;
        }
        let removed = self.store.delete_active_session();
        self.display();
        Some(removed)
    }

    /// Switch to another conversation; unknown ids are ignored
    pub fn switch_chat(&mut self, id: &str) -> bool {
        let switched = self.store.switch_active(id);
        if switched {
            self.display();
        }
        switched
    }

    /// Place the user message and a pending reply in the active session
    ///
    /// Returns `None` for blank input.
    pub fn begin_send(&mut self, text: &str) -> Option<PendingSend> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.store.append_message(Role::User, text, false);
        let message_id = self.store.append_message(Role::Assistant, "", true);
        self.display();
        Some(PendingSend {
            message_id,
            text: text.to_string(),
        })
    }

    /// Finalize a pending reply with the exchange outcome
    ///
    /// Returns `false` when the placeholder is no longer in the active chat,
    /// in which case the reply is dropped.
    pub fn finish_send(&mut self, pending: &PendingSend, outcome: Result<String>) -> bool {
        let content = match outcome {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(message_id = %pending.message_id, "Chat exchange failed: {:#}", e);
                SEND_FAILURE_TEXT.to_string()
            }
        };
        let updated = self.store.update_message(&pending.message_id, content);
        self.display();
        updated
    }

    /// Send a user message and wait for its reply
    ///
    /// Returns the id of the assistant message, or `None` for blank input.
    /// Failures end up as the assistant message's content, never as errors.
    pub async fn send_user_message(&mut self, text: &str) -> Option<MessageId> {
        let pending = self.begin_send(text)?;
        let outcome = self.backend().exchange(&pending.text).await;
        self.finish_send(&pending, outcome);
        Some(pending.message_id)
    }

    /// Content of the last assistant message in the active chat
    pub fn copy_last_reply(&mut self) -> Option<String> {
        self.store
            .active_session()
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.content.clone())
    }

    /// Plain-text transcript of the active chat
    pub fn export_active_chat(&mut self) -> String {
        export_text(self.store.active_session())
    }

    fn display(&mut self) {
        self.store.refresh_active_title();
    }
}

/// Render a session as `You: ...` / `AI: ...` blocks separated by blank lines
pub fn export_text(session: &Session) -> String {
    session
        .messages
        .iter()
        .map(|m| format!("{}: {}", m.role.label(), m.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}
