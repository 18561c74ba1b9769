//! Configuration management for Cravt
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{CravtError, Result};
use crate::storage::sled_store::default_storage_path;
use crate::storage::DEFAULT_STORAGE_KEY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Cravt
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Chat backend endpoint settings
    #[serde(default)]
    pub backend: BackendConfig,
    /// Where chats are kept between runs
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Chat backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Endpoint receiving `{"message": ...}` POSTs
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Request timeout in seconds; unset leaves the HTTP client default
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

fn default_backend_url() -> String {
    "http://localhost:5000/chat".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            timeout_seconds: None,
        }
    }
}

/// Chat storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database location; defaults to the platform data directory
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Key the chat collection is stored under
    #[serde(default = "default_storage_key")]
    pub key: String,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            key: default_storage_key(),
        }
    }
}

impl StorageConfig {
    /// Configured path, or the platform default
    pub fn resolved_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => default_storage_path(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CravtError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| CravtError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(url) = std::env::var("CRAVT_BACKEND_URL") {
            tracing::debug!(url = %url, "Env override: CRAVT_BACKEND_URL");
            self.backend.url = url;
        }

        if let Ok(timeout) = std::env::var("CRAVT_BACKEND_TIMEOUT_SECONDS") {
            match timeout.parse::<u64>() {
                Ok(v) => self.backend.timeout_seconds = Some(v),
                Err(_) => tracing::warn!("Invalid CRAVT_BACKEND_TIMEOUT_SECONDS: {}", timeout),
            }
        }

        if let Ok(path) = std::env::var("CRAVT_STORAGE_PATH") {
            tracing::debug!(path = %path, "Env override: CRAVT_STORAGE_PATH");
            self.storage.path = Some(PathBuf::from(path));
        }

        if let Ok(key) = std::env::var("CRAVT_STORAGE_KEY") {
            self.storage.key = key;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(url) = &cli.backend_url {
            self.backend.url = url.clone();
        }
        if let Some(path) = &cli.storage_path {
            self.storage.path = Some(path.clone());
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `CravtError::Config` describing the first invalid setting
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.backend.url).map_err(|e| {
            CravtError::Config(format!("Invalid backend url {}: {}", self.backend.url, e))
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CravtError::Config(format!(
                "Backend url must use http or https, got: {}",
                parsed.scheme()
            ))
            .into());
        }

        if self.backend.timeout_seconds == Some(0) {
            return Err(CravtError::Config(
                "backend.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.storage.key.trim().is_empty() {
            return Err(CravtError::Config("storage.key cannot be empty".to_string()).into());
        }

        Ok(())
    }
}
