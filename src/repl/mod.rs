//! Interactive REPL for ask-chat
//!
//! Provides a readline-based interface with:
//! - Command history
//! - Multi-line input support
//! - Markdown-rendered answers with cited sources
//! - Ctrl+C to stop a request that is still waiting

pub mod colors;
pub mod commands;
pub mod display;
pub mod helper;
pub mod render;

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::api::{AskClient, Asker};
use crate::chat::{ChatController, Message};
use crate::config::Settings;

use colors::Theme;
use commands::{CommandHandler, Flow};
use display::format_message;
use helper::ChatHelper;

/// REPL state
pub struct Repl {
    /// Readline editor with history and completion
    editor: Editor<ChatHelper, DefaultHistory>,
    controller: ChatController<AskClient>,
    /// Session-wide Ctrl+C listener
    interrupts: Interrupts,
    theme: Theme,
    show_sources: bool,
    /// History file path
    history_path: PathBuf,
    /// When this REPL instance started (used for /version)
    start_time: Instant,
}

impl Repl {
    pub fn new(client: AskClient, settings: &Settings) -> Result<Self> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(ChatHelper::new()));

        Ok(Self {
            editor,
            controller: ChatController::new(client),
            interrupts: Interrupts::install()?,
            theme: settings.theme,
            show_sources: settings.show_sources,
            history_path: settings.history_path.clone(),
            start_time: Instant::now(),
        })
    }

    /// Load command history
    fn load_history(&mut self) {
        if self.history_path.exists() {
            let _ = self.editor.load_history(&self.history_path);
        }
    }

    /// Save command history
    fn save_history(&mut self) {
        if let Some(parent) = self.history_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = self.editor.save_history(&self.history_path) {
            tracing::debug!("could not save history: {}", e);
        }
    }

    /// Run the REPL loop
    pub async fn run(&mut self) -> Result<()> {
        self.load_history();

        let palette = self.theme.palette();
        println!("Ask a question (Ctrl+D to exit, /help for commands)");
        println!(
            "{}",
            palette.status("  End a line with \\ to keep typing on the next one")
        );
        println!("{}", palette.status("  Press Ctrl+C to stop an answer in progress"));
        println!();

        loop {
            let input = self.read_input()?;

            match input {
                Some(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    self.editor.add_history_entry(trimmed)?;

                    // Handle slash commands
                    if trimmed.starts_with('/') {
                        let mut handler = CommandHandler {
                            controller: &mut self.controller,
                            theme: &mut self.theme,
                            show_sources: &mut self.show_sources,
                            start_time: self.start_time,
                        };
                        if handler.handle(trimmed).await? == Flow::Quit {
                            println!("Goodbye!");
                            break;
                        }
                        continue;
                    }

                    let question = trimmed.to_string();
                    self.process_input(&question).await;
                }
                None => {
                    println!("Goodbye!");
                    break;
                }
            }
        }

        self.save_history();
        Ok(())
    }

    /// Read input, joining lines that end in a backslash
    fn read_input(&mut self) -> Result<Option<String>> {
        let mut lines = Vec::new();
        let mut prompt = ">>> ";

        loop {
            match self.editor.readline(prompt) {
                Ok(line) => {
                    let continued = line.trim_end().strip_suffix('\\').map(str::to_string);
                    match continued {
                        Some(head) => {
                            lines.push(head);
                            prompt = "... ";
                        }
                        None => {
                            lines.push(line);
                            return Ok(Some(lines.join("\n")));
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    return Ok(Some(String::new())); // Empty to continue loop
                }
                Err(ReadlineError::Eof) => return Ok(None),
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    return Ok(None);
                }
            }
        }
    }

    /// Send a question and print the outcome
    async fn process_input(&mut self, question: &str) {
        let palette = self.theme.palette();
        println!("{}", palette.status("  thinking... (Ctrl+C to stop)"));

        let bot = ask_with_ctrl_c(&mut self.controller, &self.interrupts, question).await;

        if let Some(bot) = bot {
            println!();
            println!("{}", format_message(&bot, palette, self.show_sources));
        }
        if let Some(banner) = self.controller.state().error() {
            println!();
            println!("{}", palette.banner(banner));
        }
        // The banner has been shown once; it does not follow the next answer
        self.controller.state_mut().dismiss_error();
        println!();
    }
}

/// Ctrl+C listener installed once per session.
///
/// Each request arms a fresh token; a Ctrl+C cancels whichever token is
/// current.
#[derive(Clone)]
pub struct Interrupts {
    current: Arc<Mutex<CancellationToken>>,
}

impl Interrupts {
    /// Register the signal listener and start the watcher task
    pub fn install() -> std::io::Result<Self> {
        let current = Arc::new(Mutex::new(CancellationToken::new()));
        let watched = Arc::clone(&current);

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            // Registered here, before any request can start
            let mut sigint = signal(SignalKind::interrupt())?;
            tokio::spawn(async move {
                while sigint.recv().await.is_some() {
                    cancel_current(&watched);
                }
            });
        }

        #[cfg(not(unix))]
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                cancel_current(&watched);
            }
        });

        Ok(Self { current })
    }

    /// Fresh token for the next request, replacing the previous one
    pub fn arm(&self) -> CancellationToken {
        let token = CancellationToken::new();
        if let Ok(mut current) = self.current.lock() {
            *current = token.clone();
        }
        token
    }
}

fn cancel_current(current: &Mutex<CancellationToken>) {
    tracing::debug!("Ctrl+C received, cancelling request");
    if let Ok(token) = current.lock() {
        token.cancel();
    }
}

/// Ask one question, letting Ctrl+C cancel it while it is in flight.
///
/// Returns the resolved bot message, or `None` if the question was rejected.
pub async fn ask_with_ctrl_c<A: Asker>(
    controller: &mut ChatController<A>,
    interrupts: &Interrupts,
    question: &str,
) -> Option<Message> {
    let cancel = interrupts.arm();
    controller.send(question, &cancel).await.cloned()
}

/// Entry point for the REPL
pub async fn run(client: AskClient, settings: &Settings) -> Result<()> {
    let mut repl = Repl::new(client, settings)?;
    repl.run().await
}
