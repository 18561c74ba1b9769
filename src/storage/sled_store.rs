//! Durable chat collection backed by an embedded `sled` database

use crate::error::{CravtError, Result};
use crate::session::Session;
use crate::storage::{decode_sessions, encode_sessions, SessionPersistence, DEFAULT_STORAGE_KEY};
use directories::ProjectDirs;
use sled::Db;
use std::path::{Path, PathBuf};

/// Session collection stored under a single key of a `sled` database
///
/// Every save overwrites the key and flushes before returning, so the
/// on-disk state never lags the in-memory state by more than one write.
///
/// # Examples
///
/// ```
/// use cravt::storage::{SessionPersistence, SledPersistence};
///
/// # fn main() -> cravt::error::Result<()> {
/// let dir = tempfile::TempDir::new()?;
/// let store = SledPersistence::open(dir.path().join("chats.sled"), "cravt-chats")?;
/// assert!(store.load()?.is_empty());
/// # Ok(())
/// # }
/// ```
pub struct SledPersistence {
    db: Db,
    key: String,
}

impl SledPersistence {
    /// Open or create the database at `path`, using `key` as the slot
    ///
    /// # Errors
    ///
    /// Returns `CravtError::Storage` if the database cannot be opened
    pub fn open(path: impl AsRef<Path>, key: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CravtError::Storage(format!("Failed to create storage directory: {}", e))
            })?;
        }
        // save() flushes itself; without the background flusher the file
        // lock is released as soon as the handle drops
        let db = sled::Config::new()
            .path(path)
            .flush_every_ms(None)
            .open()
            .map_err(|e| CravtError::Storage(format!("Failed to open database: {}", e)))?;
        tracing::debug!(path = %path.display(), "Opened chat storage");
        Ok(Self {
            db,
            key: key.into(),
        })
    }

    /// Open the database in the platform data directory with the default key
    pub fn open_default() -> Result<Self> {
        Self::open(default_storage_path()?, DEFAULT_STORAGE_KEY)
    }

    /// Key the collection is stored under
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Location of the chat database when no path is configured
pub fn default_storage_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "cravt", "cravt")
        .ok_or_else(|| CravtError::Storage("Could not determine data directory".into()))?;
    Ok(proj_dirs.data_dir().join("chats.sled"))
}

impl SessionPersistence for SledPersistence {
    fn load(&self) -> Result<Vec<Session>> {
        match self
            .db
            .get(self.key.as_bytes())
            .map_err(|e| CravtError::Storage(format!("Get failed: {}", e)))?
        {
            Some(bytes) => decode_sessions(&bytes),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, sessions: &[Session]) -> Result<()> {
        let value = encode_sessions(sessions)?;

        self.db
            .insert(self.key.as_bytes(), value)
            .map_err(|e| CravtError::Storage(format!("Insert failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| CravtError::Storage(format!("Flush failed: {}", e)))?;

        Ok(())
    }
}
