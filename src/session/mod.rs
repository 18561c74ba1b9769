//! Chat sessions and the store that owns them

pub mod store;
pub mod types;

pub use store::{SessionStore, StateObserver};
pub use types::{
    new_id, truncate_chars, Message, MessageId, Role, Session, SessionId, PLACEHOLDER_TITLE,
    TITLE_MAX_CHARS,
};
