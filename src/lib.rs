//! Cravt - terminal chat client library
//!
//! Keeps a list of conversations in a local durable store, renders them,
//! and forwards user messages to a remote HTTP chat endpoint.
//!
//! # Architecture
//!
//! - `session`: chat sessions, messages and the `SessionStore`
//! - `storage`: persistence of the whole collection under one key
//! - `view`: pure rendering of store state and the view synchronizer
//! - `backend`: the request/reply exchange with the chat service
//! - `chat`: user-facing actions tying store, view and backend together
//! - `config`, `cli`, `commands`: configuration and terminal front end
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cravt::{ChatApp, Config, HttpBackend};
//! use cravt::storage::SledPersistence;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let storage = SledPersistence::open_default()?;
//!     let backend = HttpBackend::new(config.backend.clone())?;
//!     let mut app = ChatApp::new(Box::new(storage), Arc::new(backend));
//!     app.send_user_message("hello").await;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod session;
pub mod storage;
pub mod view;

// Re-export commonly used types
pub use backend::{ChatBackend, HttpBackend};
pub use chat::ChatApp;
pub use config::Config;
pub use error::{CravtError, Result};
pub use session::{Message, Role, Session, SessionStore};

#[cfg(test)]
pub mod test_utils;
