//! Session store: ordered chat collection plus the active-session pointer
//!
//! Every mutation persists the whole collection and then notifies the
//! registered [`StateObserver`]. Persistence failures are logged and
//! swallowed; the in-memory state stays authoritative.

use crate::session::types::{Message, MessageId, Role, Session, SessionId};
use crate::storage::SessionPersistence;

/// Subscriber invoked after each successful store mutation
pub trait StateObserver: Send {
    /// Called with the complete current state
    fn state_changed(&mut self, sessions: &[Session], active_id: &str);
}

/// Owner of all chat sessions
///
/// Invariants held between calls:
/// - the collection is never empty
/// - the active id names a session in the collection
/// - new sessions sit at the front (most recent first)
///
/// # Examples
///
/// ```
/// use cravt::session::{Role, SessionStore};
/// use cravt::storage::MemoryPersistence;
///
/// let mut store = SessionStore::open(Box::new(MemoryPersistence::new()));
/// assert_eq!(store.sessions().len(), 1);
///
/// store.append_message(Role::User, "hello", false);
/// assert_eq!(store.active_session().messages.len(), 1);
/// ```
pub struct SessionStore {
    sessions: Vec<Session>,
    active_id: SessionId,
    persistence: Box<dyn SessionPersistence>,
    observer: Option<Box<dyn StateObserver>>,
}

impl SessionStore {
    /// Rehydrate the store from `persistence`
    ///
    /// A missing or unreadable blob yields an empty collection, which then
    /// self-heals with a fresh session. Otherwise the first session becomes
    /// active.
    pub fn open(persistence: Box<dyn SessionPersistence>) -> Self {
        let sessions = match persistence.load() {
            Ok(sessions) => sessions,
            Err(e) => {
                tracing::warn!("Stored chats could not be read, starting fresh: {}", e);
                Vec::new()
            }
        };
        tracing::debug!(count = sessions.len(), "Loaded chat sessions");

        let active_id = sessions.first().map(|s| s.id.clone()).unwrap_or_default();
        let mut store = Self {
            sessions,
            active_id,
            persistence,
            observer: None,
        };
        if store.sessions.is_empty() {
            store.create_session();
        }
        store
    }

    /// Register the state-change subscriber, replacing any previous one
    ///
    /// The observer immediately receives the current state.
    pub fn set_observer(&mut self, observer: Box<dyn StateObserver>) {
        self.observer = Some(observer);
        self.notify();
    }

    /// All sessions, most recent first
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Id of the active session
    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    /// Look up a session by id
    pub fn session(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Insert a new empty session at the front and make it active
    pub fn create_session(&mut self) -> SessionId {
        let session = Session::new();
        let id = session.id.clone();
        self.sessions.insert(0, session);
        self.active_id = id.clone();
        tracing::debug!(session_id = %id, "Created session");
        self.persist();
        self.notify();
        id
    }

    /// Remove the active session
    ///
    /// The first remaining session becomes active; when none remain a new
    /// session replaces the deleted one. Confirmation is the caller's job.
    /// Returns the id of the removed session.
    pub fn delete_active_session(&mut self) -> SessionId {
        let removed = self.active_id.clone();
        self.sessions.retain(|s| s.id != removed);
        tracing::debug!(session_id = %removed, "Deleted session");

        match self.sessions.first() {
            Some(first) => {
                self.active_id = first.id.clone();
                self.persist();
                self.notify();
            }
            None => {
                self.create_session();
            }
        }
        removed
    }

    /// Make `id` the active session
    ///
    /// Unknown ids leave the store untouched. Returns whether the switch
    /// happened.
    pub fn switch_active(&mut self, id: &str) -> bool {
        if self.session(id).is_none() {
            tracing::debug!(session_id = %id, "Ignoring switch to unknown session");
            return false;
        }
        self.active_id = id.to_string();
        self.notify();
        true
    }

    /// Append a message to the active session
    pub fn append_message(
        &mut self,
        role: Role,
        content: impl Into<String>,
        pending: bool,
    ) -> MessageId {
        let message = Message::new(role, content, pending);
        let id = message.id.clone();
        let idx = self.active_index();
        self.sessions[idx].messages.push(message);
        tracing::debug!(message_id = %id, %role, pending, "Appended message");
        self.persist();
        self.notify();
        id
    }

    /// Finalize a message of the active session
    ///
    /// Sets its content and clears the pending flag. Returns `false` without
    /// touching anything when the active session holds no such message.
    pub fn update_message(&mut self, id: &str, content: impl Into<String>) -> bool {
        let idx = self.active_index();
        let Some(message) = self.sessions[idx].message_mut(id) else {
            tracing::debug!(message_id = %id, "Update for unknown message ignored");
            return false;
        };
        message.content = content.into();
        message.pending = false;
        self.persist();
        self.notify();
        true
    }

    /// The active session, self-healing when the pointer is stale
    pub fn active_session(&mut self) -> &Session {
        let idx = self.active_index();
        &self.sessions[idx]
    }

    /// Apply the derived-title rule to the active session
    ///
    /// Run whenever the active session is displayed. Returns `true` when the
    /// title changed, in which case the collection is persisted and the
    /// observer notified.
    pub fn refresh_active_title(&mut self) -> bool {
        let idx = self.active_index();
        if !self.sessions[idx].derive_title() {
            return false;
        }
        tracing::debug!(
            session_id = %self.sessions[idx].id,
            title = %self.sessions[idx].title,
            "Derived session title"
        );
        self.persist();
        self.notify();
        true
    }

    fn active_index(&mut self) -> usize {
        if let Some(idx) = self.sessions.iter().position(|s| s.id == self.active_id) {
            return idx;
        }
        tracing::warn!(active_id = %self.active_id, "Active session missing, creating a new one");
        self.create_session();
        0
    }

    fn persist(&self) {
        if let Err(e) = self.persistence.save(&self.sessions) {
            tracing::warn!("Failed to persist chats: {}", e);
        }
    }

    fn notify(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer.state_changed(&self.sessions, &self.active_id);
        }
    }
}
