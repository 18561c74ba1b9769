//! Persistence for the chat collection
//!
//! The whole session collection is written as a single JSON array under one
//! well-known key and overwritten on every mutation. Array order is display
//! order.

use crate::error::{CravtError, Result};
use crate::session::Session;
use std::sync::Mutex;

pub mod sled_store;
pub use sled_store::SledPersistence;

/// Key the collection is stored under unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "cravt-chats";

/// Durable slot holding the whole session collection
///
/// `load` returns an empty collection when nothing has been stored yet and
/// an error when the stored blob cannot be read back.
pub trait SessionPersistence: Send + Sync {
    /// Read the stored collection
    fn load(&self) -> Result<Vec<Session>>;

    /// Overwrite the stored collection
    fn save(&self, sessions: &[Session]) -> Result<()>;
}

/// Encode a collection into the persisted blob format
pub fn encode_sessions(sessions: &[Session]) -> Result<Vec<u8>> {
    serde_json::to_vec(sessions)
        .map_err(|e| CravtError::Storage(format!("Serialization failed: {}", e)).into())
}

/// Decode a persisted blob back into a collection
pub fn decode_sessions(bytes: &[u8]) -> Result<Vec<Session>> {
    serde_json::from_slice(bytes)
        .map_err(|e| CravtError::Storage(format!("Deserialization failed: {}", e)).into())
}

/// In-memory persistence
///
/// Holds the encoded blob exactly as a durable backend would, which keeps
/// the encode/decode path exercised. Useful for tests and throwaway runs.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    blob: Mutex<Option<Vec<u8>>>,
}

impl MemoryPersistence {
    /// Create an empty slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot pre-filled with raw bytes
    pub fn with_blob(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            blob: Mutex::new(Some(bytes.into())),
        }
    }

    /// Copy of the raw stored bytes
    pub fn blob(&self) -> Option<Vec<u8>> {
        self.blob.lock().ok().and_then(|guard| guard.clone())
    }
}

impl SessionPersistence for MemoryPersistence {
    fn load(&self) -> Result<Vec<Session>> {
        let guard = self
            .blob
            .lock()
            .map_err(|_| CravtError::Storage("Memory slot poisoned".into()))?;
        match guard.as_deref() {
            Some(bytes) => decode_sessions(bytes),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, sessions: &[Session]) -> Result<()> {
        let bytes = encode_sessions(sessions)?;
        let mut guard = self
            .blob
            .lock()
            .map_err(|_| CravtError::Storage("Memory slot poisoned".into()))?;
        *guard = Some(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Message, Role};

    #[test]
    fn test_memory_persistence_empty_load() {
        let persistence = MemoryPersistence::new();
        assert!(persistence.load().unwrap().is_empty());
        assert!(persistence.blob().is_none());
    }

    #[test]
    fn test_memory_persistence_round_trip() {
        let persistence = MemoryPersistence::new();
        let mut session = Session::new();
        session.messages.push(Message::new(Role::User, "hi", false));
        let sessions = vec![session, Session::new()];

        persistence.save(&sessions).unwrap();
        assert_eq!(persistence.load().unwrap(), sessions);
    }

    #[test]
    fn test_memory_persistence_rejects_garbage() {
        let persistence = MemoryPersistence::with_blob(b"not json".to_vec());
        let err = persistence.load().unwrap_err();
        assert!(err.to_string().contains("Deserialization failed"));
    }

    #[test]
    fn test_blob_is_json_array_in_display_order() {
        let first = Session::new();
        let second = Session::new();
        let bytes = encode_sessions(&[first.clone(), second.clone()]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[0]["id"], first.id.as_str());
        assert_eq!(array[1]["id"], second.id.as_str());
    }
}
