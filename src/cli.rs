//! Command-line interface definition for Cravt
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cravt - chat with a remote assistant from the terminal
///
/// Conversations are kept locally and survive restarts.
#[derive(Parser, Debug, Clone)]
#[command(name = "cravt")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the chat backend endpoint
    #[arg(long)]
    pub backend_url: Option<String>,

    /// Override the chat storage location
    #[arg(long)]
    pub storage_path: Option<PathBuf>,

    /// Command to execute (defaults to interactive chat)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for Cravt
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the interactive chat
    Chat,

    /// Send one message to the most recent chat and print the reply
    Send {
        /// Message text
        message: String,

        /// Start a new chat for this message
        #[arg(short, long)]
        new: bool,
    },

    /// List stored chats
    List,

    /// Export a chat as plain text
    Export {
        /// Chat id to export (defaults to the most recent chat)
        #[arg(short, long)]
        id: Option<String>,

        /// Output file (use "-" for stdout)
        #[arg(short, long, default_value = crate::chat::EXPORT_FILE_NAME)]
        output: PathBuf,
    },

    /// Delete a chat
    Delete {
        /// Chat id to delete (defaults to the most recent chat)
        #[arg(short, long)]
        id: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
