//! Error types for Cravt
//!
//! This module defines the error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Cravt operations
///
/// Store operations recover from every failure locally, so these errors
/// only surface from configuration loading, persistence backends and the
/// backend exchange before the send flow converts them to a reply text.
#[derive(Error, Debug)]
pub enum CravtError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend exchange errors (unreachable host, non-success status)
    #[error("Backend error: {0}")]
    Backend(String),

    /// Backend replied with a body that does not match the reply contract
    #[error("Protocol violation: {0}")]
    Protocol(String),

    /// Chat collection storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Cravt operations
///
/// Uses `anyhow::Error` so callers can attach context while the typed
/// `CravtError` stays recoverable through `downcast_ref`.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = CravtError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_backend_error_display() {
        let error = CravtError::Backend("status 502".to_string());
        assert_eq!(error.to_string(), "Backend error: status 502");
    }

    #[test]
    fn test_protocol_error_display() {
        let error = CravtError::Protocol("missing reply field".to_string());
        assert_eq!(error.to_string(), "Protocol violation: missing reply field");
    }

    #[test]
    fn test_storage_error_display() {
        let error = CravtError::Storage("flush failed".to_string());
        assert_eq!(error.to_string(), "Storage error: flush failed");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: CravtError = io_error.into();
        assert!(matches!(error, CravtError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: CravtError = json_error.into();
        assert!(matches!(error, CravtError::Serialization(_)));
    }

    #[test]
    fn test_error_downcasts_through_anyhow() {
        let result: Result<()> = Err(CravtError::Protocol("bad".into()).into());
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CravtError>(),
            Some(CravtError::Protocol(_))
        ));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CravtError>();
    }
}
