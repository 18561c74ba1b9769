/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `chat`    — Interactive chat
- `send`    — Send one message and print the reply
- `list`    — Show stored chats
- `export`  — Write a chat transcript to a file
- `delete`  — Remove a chat

All handlers open the same `ChatApp` over the configured storage and
backend, so they share one view of the chat collection.
*/

use crate::backend::HttpBackend;
use crate::chat::ChatApp;
use crate::config::Config;
use crate::error::{CravtError, Result};
use crate::session::Role;
use crate::storage::SledPersistence;
use crate::view::{Frame, MessageList, SessionListItem};
use colored::Colorize;
use rustyline::DefaultEditor;
use std::sync::Arc;

// Special commands parser for the interactive prompt
pub mod special_commands;

/// Open the chat application over the configured storage and backend
pub fn open_app(config: &Config) -> Result<ChatApp> {
    let path = config.storage.resolved_path()?;
    tracing::debug!(path = %path.display(), key = %config.storage.key, "Opening chats");
    let persistence = SledPersistence::open(&path, config.storage.key.clone())?;
    let backend = HttpBackend::new(config.backend.clone())?;
    Ok(ChatApp::new(Box::new(persistence), Arc::new(backend)))
}

/// Make `id` active, failing when no chat has that id
fn select_chat(app: &mut ChatApp, id: Option<&str>) -> Result<()> {
    if let Some(id) = id {
        if !app.switch_chat(id) {
            return Err(CravtError::Storage(format!("No chat with id {}", id)).into());
        }
    }
    Ok(())
}

/// Whether a confirmation answer means yes; anything else is a no
fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Ask a yes/no question on the terminal
fn confirm(rl: &mut DefaultEditor, question: &str) -> bool {
    match rl.readline(&format!("{} [y/N] ", question)) {
        Ok(answer) => is_yes(&answer),
        Err(_) => false,
    }
}

fn print_session_list(items: &[SessionListItem]) {
    for (n, item) in items.iter().enumerate() {
        let marker = if item.active { "*" } else { " " };
        let title = if item.active {
            item.title.bold().to_string()
        } else {
            item.title.clone()
        };
        println!(
            "{} {:>2}. {}  {}",
            marker.green(),
            n + 1,
            title,
            item.preview.dimmed()
        );
    }
}

fn print_message_list(messages: &MessageList) {
    match messages {
        MessageList::Empty { hint } => println!("  {}\n", hint.dimmed()),
        MessageList::Messages(items) => {
            for item in items {
                let label = match item.role {
                    Role::User => item.role.label().cyan(),
                    Role::Assistant => item.role.label().magenta(),
                };
                println!("{}: {}\n", label.bold(), item.text);
            }
        }
    }
}

fn print_frame(frame: &Frame) {
    println!(
        "\n{}  {}",
        frame.header.title.bold(),
        frame.header.created.dimmed()
    );
    println!("{}", "─".repeat(62).dimmed());
    print_message_list(&frame.messages);
}

/// Put `text` on the system clipboard, falling back to printing it
fn copy_to_clipboard(text: &str) {
    let copied = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text));
    match copied {
        Ok(()) => println!("{}", "Copied last reply to clipboard".green()),
        Err(e) => {
            tracing::warn!("Clipboard unavailable: {}", e);
            println!("{}", "Clipboard unavailable, last reply:".yellow());
            println!("{}", text);
        }
    }
}

/// Write an export to `output`, or stdout for `-`
fn write_export(text: &str, output: &std::path::Path) -> Result<()> {
    if output == std::path::Path::new("-") {
        println!("{}", text);
        return Ok(());
    }
    std::fs::write(output, text).map_err(CravtError::Io)?;
    println!(
        "{}",
        format!("Exported chat to {}", output.display()).green()
    );
    Ok(())
}

// Chat command handler
pub mod chat {
    //! Interactive chat handler.
    //!
    //! Lines are read on a dedicated thread so slash commands keep working
    //! while replies are outstanding. Every other line starts an exchange
    //! in the background; its reply is finalized when it arrives.

    use super::special_commands::{parse_special_command, print_help, ChatRef, SpecialCommand};
    use super::*;
    use crate::chat::{PendingSend, EXPORT_FILE_NAME};
    use rustyline::error::ReadlineError;
    use std::path::PathBuf;
    use tokio::sync::mpsc;
    use tokio::task::{JoinError, JoinSet};

    pub(crate) type Exchange = (PendingSend, Result<String>);

    /// Line editor running on its own thread
    ///
    /// Shows a prompt only when asked to, so output printed between two
    /// reads never lands in the middle of the input line.
    struct LineReader {
        prompts: std::sync::mpsc::Sender<(String, bool)>,
        lines: mpsc::UnboundedReceiver<rustyline::Result<String>>,
    }

    impl LineReader {
        fn spawn() -> Self {
            let (prompt_tx, prompt_rx) = std::sync::mpsc::channel::<(String, bool)>();
            let (line_tx, line_rx) = mpsc::unbounded_channel();

            std::thread::spawn(move || {
                let mut rl = match DefaultEditor::new() {
                    Ok(rl) => rl,
                    Err(e) => {
                        let _ = line_tx.send(Err(e));
                        return;
                    }
                };
                while let Ok((prompt, record)) = prompt_rx.recv() {
                    let read = rl.readline(&prompt);
                    if let Ok(line) = &read {
                        if record && !line.trim().is_empty() {
                            let _ = rl.add_history_entry(line.as_str());
                        }
                    }
                    let failed = read.is_err();
                    if line_tx.send(read).is_err() || failed {
                        break;
                    }
                }
            });

            Self {
                prompts: prompt_tx,
                lines: line_rx,
            }
        }

        /// Ask for one line; `record` keeps it in the history
        fn request(&self, prompt: &str, record: bool) {
            let _ = self.prompts.send((prompt.to_string(), record));
        }

        /// Next line read, or `None` once the reader thread has stopped
        async fn next(&mut self) -> Option<rustyline::Result<String>> {
            self.lines.recv().await
        }
    }

    /// Start interactive chat
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration
    pub async fn run_chat(config: Config) -> Result<()> {
        tracing::info!("Starting interactive chat");

        let mut app = open_app(&config)?;
        let mut input = LineReader::spawn();
        let mut exchanges: JoinSet<Exchange> = JoinSet::new();
        let prompt = format!("{} ", "you>".cyan().bold());

        print_welcome_banner(&config);
        print_frame(&app.frame());

        loop {
            input.request(&prompt, true);
            let read = loop {
                tokio::select! {
                    read = input.next() => break read,
                    Some(done) = exchanges.join_next(), if !exchanges.is_empty() => {
                        finish_exchange(&mut app, done);
                    }
                }
            };

            match read {
                Some(Ok(line)) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    let command = match parse_special_command(trimmed) {
                        Ok(command) => command,
                        Err(e) => {
                            println!("{}", e.to_string().red());
                            continue;
                        }
                    };

                    match command {
                        SpecialCommand::NewChat => {
                            app.new_chat();
                            print_frame(&app.frame());
                        }
                        SpecialCommand::ListChats => {
                            print_session_list(&app.frame().sessions);
                        }
                        SpecialCommand::SwitchChat(target) => {
                            let id = match target {
                                ChatRef::Index(n) => app
                                    .store()
                                    .sessions()
                                    .get(n - 1)
                                    .map(|s| s.id.clone()),
                                ChatRef::Id(id) => Some(id),
                            };
                            match id {
                                Some(id) if app.switch_chat(&id) => print_frame(&app.frame()),
                                _ => println!("{}", "No such chat, see /chats".yellow()),
                            }
                        }
                        SpecialCommand::DeleteChat => {
                            let title = app.active_session().title.clone();
                            input.request(&format!("Delete chat \"{}\"? [y/N] ", title), false);
                            let yes = matches!(input.next().await, Some(Ok(answer)) if is_yes(&answer));
                            if app.delete_active_chat(|_| yes).is_some() {
                                println!("{}", "Chat deleted".green());
                                print_frame(&app.frame());
                            }
                        }
                        SpecialCommand::CopyLast => match app.copy_last_reply() {
                            Some(reply) => copy_to_clipboard(&reply),
                            None => println!("{}", "No reply to copy yet".yellow()),
                        },
                        SpecialCommand::Export(path) => {
                            let output = path.unwrap_or_else(|| PathBuf::from(EXPORT_FILE_NAME));
                            if let Err(e) = write_export(&app.export_active_chat(), &output) {
                                println!("{}", format!("Export failed: {}", e).red());
                            }
                        }
                        SpecialCommand::Help => print_help(),
                        SpecialCommand::Exit => break,
                        SpecialCommand::None => {
                            if start_send(&mut app, &mut exchanges, trimmed) {
                                print_frame(&app.frame());
                            }
                        }
                    }
                }
                Some(Err(ReadlineError::Interrupted)) => {
                    println!("CTRL-C");
                    break;
                }
                Some(Err(ReadlineError::Eof)) => {
                    println!("CTRL-D");
                    break;
                }
                Some(Err(err)) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
                None => break,
            }
        }

        if !exchanges.is_empty() {
            tracing::info!(outstanding = exchanges.len(), "Leaving with replies still pending");
        }
        Ok(())
    }

    /// Place `text` in the active chat and run its exchange in the background
    ///
    /// Returns `false` for blank input.
    pub(crate) fn start_send(
        app: &mut ChatApp,
        exchanges: &mut JoinSet<Exchange>,
        text: &str,
    ) -> bool {
        let Some(pending) = app.begin_send(text) else {
            return false;
        };
        let backend = app.backend();
        exchanges.spawn(async move {
            let outcome = backend.exchange(&pending.text).await;
            (pending, outcome)
        });
        true
    }

    /// Finalize a finished exchange, printing the chat when it changed
    pub(crate) fn finish_exchange(
        app: &mut ChatApp,
        done: std::result::Result<Exchange, JoinError>,
    ) -> bool {
        match done {
            Ok((pending, outcome)) => {
                if app.finish_send(&pending, outcome) {
                    print_frame(&app.frame());
                    true
                } else {
                    println!("{}", "\nA reply for another chat was dropped".dimmed());
                    false
                }
            }
            Err(e) => {
                tracing::warn!("Chat exchange task failed: {}", e);
                false
            }
        }
    }

    fn print_welcome_banner(config: &Config) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    Cravt Chat - Welcome!                     ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Backend: {}", config.backend.url.cyan());
        println!("Type '/help' for available commands, 'exit' to quit");
    }
}

pub mod send {
    use super::*;

    /// Send one message to the most recent chat (or a new one) and print the reply
    pub async fn run_send(config: Config, message: String, new_chat: bool) -> Result<()> {
        let mut app = open_app(&config)?;
        if new_chat {
            app.new_chat();
        }

        let Some(reply_id) = app.send_user_message(&message).await else {
            return Err(CravtError::Config("Message cannot be empty".to_string()).into());
        };

        let reply = app
            .active_session()
            .messages
            .iter()
            .find(|m| m.id == reply_id)
            .map(|m| m.content.clone())
            .unwrap_or_default();
        println!("{}", reply);
        Ok(())
    }
}

pub mod list {
    use super::*;
    use prettytable::{format, Table};

    /// Print all stored chats, most recent first
    pub fn run_list(config: Config) -> Result<()> {
        let mut app = open_app(&config)?;
        let sessions = app.store().sessions().to_vec();
        let items = app.frame().sessions;

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
        table.add_row(prettytable::row![
            "ID".bold(),
            "Title".bold(),
            "Messages".bold(),
            "Created".bold(),
            "Last".bold()
        ]);

        for (item, session) in items.iter().zip(sessions.iter()) {
            let created = session.created.format("%Y-%m-%d %H:%M").to_string();
            table.add_row(prettytable::row![
                item.id.cyan(),
                item.title,
                session.messages.len(),
                created,
                item.preview
            ]);
        }

        println!("\nChats:");
        table.printstd();
        println!();
        Ok(())
    }
}

pub mod export {
    use super::*;
    use std::path::PathBuf;

    /// Export a chat transcript
    pub fn run_export(config: Config, id: Option<String>, output: PathBuf) -> Result<()> {
        let mut app = open_app(&config)?;
        select_chat(&mut app, id.as_deref())?;
        write_export(&app.export_active_chat(), &output)
    }
}

pub mod delete {
    use super::*;

    /// Delete a chat, asking first unless `yes` is set
    pub fn run_delete(config: Config, id: Option<String>, yes: bool) -> Result<()> {
        let mut app = open_app(&config)?;
        select_chat(&mut app, id.as_deref())?;

        let removed = if yes {
            app.delete_active_chat(|_| true)
        } else {
            let mut rl = DefaultEditor::new()?;
            app.delete_active_chat(|session| {
                confirm(&mut rl, &format!("Delete chat \"{}\"?", session.title))
            })
        };

        match removed {
            Some(id) => println!("{}", format!("Deleted chat {}", id).green()),
            None => println!("{}", "Kept chat".yellow()),
        }
        Ok(())
    }
}
