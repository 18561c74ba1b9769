//! Test utilities for Cravt
//!
//! Temporary storage locations, a scripted backend and assertion helpers
//! shared by the unit tests.

use crate::backend::ChatBackend;
use crate::config::{Config, StorageConfig};
use crate::error::{CravtError, Result};
use async_trait::async_trait;
use std::sync::Mutex;
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Default configuration whose storage lives inside `dir`
pub fn temp_config(dir: &TempDir) -> Config {
    Config {
        storage: StorageConfig {
            path: Some(dir.path().join("chats.sled")),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Assert that an error contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T>(result: Result<T>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = e.to_string();
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

/// Backend answering from a fixed script, recording what it was sent
///
/// `None` entries in the script fail the exchange.
pub struct ScriptedBackend {
    replies: Mutex<Vec<Option<String>>>,
    received: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<Option<&str>>) -> Self {
        Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .rev()
                    .map(|r| r.map(str::to_string))
                    .collect(),
            ),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Messages received so far, in order
    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn exchange(&self, message: &str) -> Result<String> {
        self.received.lock().unwrap().push(message.to_string());
        match self.replies.lock().unwrap().pop().flatten() {
            Some(reply) => Ok(reply),
            None => Err(CravtError::Backend("scripted failure".into()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_config_points_into_dir() {
        let dir = temp_dir();
        let config = temp_config(&dir);
        assert!(config.storage.path.unwrap().starts_with(dir.path()));
    }

    #[test]
    fn test_assert_error_contains_success() {
        let result: Result<()> = Err(CravtError::Config("test error message".to_string()).into());
        assert_error_contains(result, "test error");
    }

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        assert_error_contains(Ok(()), "error");
    }

    #[tokio::test]
    async fn test_scripted_backend_replays_in_order() {
        let backend = ScriptedBackend::new(vec![Some("one"), None, Some("three")]);
        assert_eq!(backend.exchange("a").await.unwrap(), "one");
        assert!(backend.exchange("b").await.is_err());
        assert_eq!(backend.exchange("c").await.unwrap(), "three");
        assert!(backend.exchange("d").await.is_err());
        assert_eq!(backend.received(), vec!["a", "b", "c", "d"]);
    }
}
