//! Chat backend exchange
//!
//! One request/reply round trip per user message: POST `{"message": ...}`
//! as JSON, expect `{"reply": "..."}` back. Anything else is a failure.

use crate::config::BackendConfig;
use crate::error::{CravtError, Result};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Remote service that answers chat messages
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send the user's text and return the reply
    async fn exchange(&self, message: &str) -> Result<String>;
}

/// Request body
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// Response body
#[derive(Debug, Deserialize)]
struct ChatReply {
    reply: String,
}

/// HTTP implementation of [`ChatBackend`]
///
/// # Examples
///
/// ```no_run
/// use cravt::backend::{ChatBackend, HttpBackend};
/// use cravt::config::BackendConfig;
///
/// # async fn example() -> cravt::error::Result<()> {
/// let backend = HttpBackend::new(BackendConfig::default())?;
/// let reply = backend.exchange("hello").await?;
/// # Ok(())
/// # }
/// ```
pub struct HttpBackend {
    client: Client,
    url: String,
}

impl HttpBackend {
    /// Build a client for the configured endpoint
    ///
    /// No timeout is applied unless `timeout_seconds` is set.
    pub fn new(config: BackendConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!("cravt/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| CravtError::Backend(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: config.url,
        })
    }

    /// Endpoint requests are posted to
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn exchange(&self, message: &str) -> Result<String> {
        tracing::debug!(url = %self.url, chars = message.chars().count(), "Posting chat message");

        let response = self
            .client
            .post(&self.url)
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(CravtError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "Backend returned an error status");
            return Err(CravtError::Backend(format!("status {}: {}", status, body)).into());
        }

        let bytes = response.bytes().await.map_err(CravtError::Http)?;
        let reply: ChatReply = serde_json::from_slice(&bytes)
            .map_err(|e| CravtError::Protocol(format!("expected {{\"reply\": string}}: {}", e)))?;

        tracing::debug!(chars = reply.reply.chars().count(), "Received chat reply");
        Ok(reply.reply)
    }
}
