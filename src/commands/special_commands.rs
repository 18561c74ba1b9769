//! Special commands parser for interactive chat
//!
//! Lines starting with `/` act on the chat list instead of being sent to
//! the backend. Commands are case-insensitive; arguments keep their case.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// How a chat is referred to from the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatRef {
    /// 1-based position in the chat list
    Index(usize),
    /// Full session id
    Id(String),
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Start a new chat
    NewChat,

    /// Show the chat list
    ListChats,

    /// Make another chat active
    SwitchChat(ChatRef),

    /// Delete the active chat after confirmation
    DeleteChat,

    /// Copy the last reply to the clipboard
    CopyLast,

    /// Write the active chat to a text file
    Export(Option<PathBuf>),

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command; send the input to the backend
    None,
}

/// Parse a user input line into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` for an unrecognized `/command`,
/// `CommandError::MissingArgument` when `/switch` has no target and
/// `CommandError::UnsupportedArgument` for a bad `/switch` index or a stray
/// argument.
///
/// # Examples
///
/// ```
/// use cravt::commands::special_commands::{parse_special_command, ChatRef, SpecialCommand};
///
/// assert_eq!(parse_special_command("/new").unwrap(), SpecialCommand::NewChat);
/// assert_eq!(
///     parse_special_command("/switch 2").unwrap(),
///     SpecialCommand::SwitchChat(ChatRef::Index(2))
/// );
/// assert_eq!(parse_special_command("hello").unwrap(), SpecialCommand::None);
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') {
        return match lower.as_str() {
            "exit" | "quit" => Ok(SpecialCommand::Exit),
            _ => Ok(SpecialCommand::None),
        };
    }

    let (command, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((command, rest)) => (command.to_lowercase(), rest.trim()),
        None => (lower.clone(), ""),
    };

    let no_args = |cmd: SpecialCommand| {
        if rest.is_empty() {
            Ok(cmd)
        } else {
            Err(CommandError::UnsupportedArgument {
                command: command.clone(),
                arg: rest.to_string(),
            })
        }
    };

    match command.as_str() {
        "/new" => no_args(SpecialCommand::NewChat),
        "/chats" | "/list" => no_args(SpecialCommand::ListChats),
        "/delete" => no_args(SpecialCommand::DeleteChat),
        "/copy" => no_args(SpecialCommand::CopyLast),
        "/help" | "/?" => no_args(SpecialCommand::Help),
        "/exit" | "/quit" => no_args(SpecialCommand::Exit),
        "/export" => Ok(SpecialCommand::Export(
            (!rest.is_empty()).then(|| PathBuf::from(rest)),
        )),
        "/switch" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "/switch".to_string(),
                    usage: "/switch <number|id>".to_string(),
                });
            }
            if rest.chars().all(|c| c.is_ascii_digit()) {
                match rest.parse::<usize>() {
                    Ok(n) if n > 0 => Ok(SpecialCommand::SwitchChat(ChatRef::Index(n))),
                    _ => Err(CommandError::UnsupportedArgument {
                        command: "/switch".to_string(),
                        arg: rest.to_string(),
                    }),
                }
            } else {
                Ok(SpecialCommand::SwitchChat(ChatRef::Id(rest.to_string())))
            }
        }
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Print help for special commands
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat
=====================================

CHATS:
  /new              - Start a new chat
  /chats            - List chats (also /list)
  /switch <n|id>    - Switch to chat number n from /chats, or by id
  /delete           - Delete the current chat (asks for confirmation)

REPLIES:
  /copy             - Copy the last reply to the clipboard
  /export [path]    - Save the current chat as text (default: cravt-chat.txt)

OTHER:
  /help             - Show this help message
  exit, quit        - Leave the chat

Anything else is sent as a message. Commands keep working while a reply
is on its way; a reply for a chat you have left is dropped.
"#
    );
}
