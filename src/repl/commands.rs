//! Slash command handlers for the REPL
//!
//! Handles /help, /clear, /theme, /sources, /health, /history, etc.

use anyhow::Result;
use std::time::Instant;

use crate::api::AskClient;
use crate::chat::ChatController;

use super::colors::Theme;
use super::display::format_message;

/// A parsed slash command
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Version,
    Clear,
    History,
    /// `None` toggles
    Theme(Option<Theme>),
    Sources,
    Health,
    Quit,
    /// Bad arguments to a known command; carries the usage line
    Usage(&'static str),
    Unknown(String),
}

impl Command {
    pub fn parse(cmd: &str) -> Self {
        let parts: Vec<&str> = cmd.trim().splitn(2, ' ').collect();
        let command = parts[0];
        let arg = parts.get(1).map(|a| a.trim()).unwrap_or("");

        match command {
            "/help" => Command::Help,
            "/version" => Command::Version,
            "/clear" => Command::Clear,
            "/history" => Command::History,
            "/theme" if arg.is_empty() => Command::Theme(None),
            "/theme" => match arg.parse() {
                Ok(theme) => Command::Theme(Some(theme)),
                Err(_) => Command::Usage("Usage: /theme [dark|light]"),
            },
            "/dark" => Command::Theme(Some(Theme::Dark)),
            "/light" => Command::Theme(Some(Theme::Light)),
            "/sources" => Command::Sources,
            "/health" => Command::Health,
            "/quit" | "/exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// What the REPL loop should do after a command
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Command handler with access to REPL state
pub struct CommandHandler<'a> {
    pub controller: &'a mut ChatController<AskClient>,
    pub theme: &'a mut Theme,
    pub show_sources: &'a mut bool,
    pub start_time: Instant,
}

impl<'a> CommandHandler<'a> {
    /// Handle a slash command
    pub async fn handle(&mut self, cmd: &str) -> Result<Flow> {
        let palette = self.theme.palette();

        match Command::parse(cmd) {
            Command::Help => {
                println!("Commands:");
                println!("  /help               - Show this help");
                println!("  /version            - Show version info");
                println!("  /clear              - Clear the conversation");
                println!("  /history            - Reprint the conversation");
                println!("  /theme [dark|light] - Switch or toggle the color theme");
                println!("  /dark, /light       - Shortcuts for /theme");
                println!("  /sources            - Toggle cited sources under answers");
                println!("  /health             - Check the ask service");
                println!("  /quit               - Exit");
                println!();
                println!("Press Ctrl+C while waiting to stop the answer.");
            }
            Command::Version => {
                println!("ask-chat v{}", env!("CARGO_PKG_VERSION"));
                println!("  Endpoint: {}", self.controller.asker().endpoint());
                println!(
                    "  Uptime:   {}",
                    format_duration(self.start_time.elapsed().as_secs())
                );
            }
            Command::Clear => {
                if self.controller.state_mut().clear() {
                    println!("{}", palette.success("Conversation cleared."));
                } else {
                    println!("{}", palette.warning("A request is still running."));
                }
            }
            Command::History => {
                let messages = self.controller.state().messages();
                if messages.is_empty() {
                    println!("{}", palette.status("No messages yet."));
                }
                for message in messages {
                    println!("{}\n", format_message(message, palette, *self.show_sources));
                }
            }
            Command::Theme(choice) => {
                let next = choice.unwrap_or_else(|| self.theme.toggled());
                *self.theme = next;
                tracing::debug!(theme = %next, "theme changed");
                println!("{}", next.palette().success(&format!("Theme: {}", next)));
            }
            Command::Sources => {
                *self.show_sources = !*self.show_sources;
                println!(
                    "Sources {}.",
                    if *self.show_sources { "shown" } else { "hidden" }
                );
            }
            Command::Health => self.cmd_health().await,
            Command::Quit => return Ok(Flow::Quit),
            Command::Usage(usage) => println!("{}", usage),
            Command::Unknown(command) => {
                println!("Unknown command: {}. Try /help", command);
            }
        }
        Ok(Flow::Continue)
    }

    /// /health - ask the service how it is doing
    async fn cmd_health(&self) {
        let palette = self.theme.palette();
        match self.controller.asker().health().await {
            Ok(health) if health.is_healthy() => {
                let version = health
                    .version
                    .map(|v| format!(" (v{})", v))
                    .unwrap_or_default();
                println!("{}", palette.success(&format!("Service healthy{}", version)));
            }
            Ok(health) => {
                let reason = health.error.unwrap_or_else(|| health.status.clone());
                println!("{}", palette.warning(&format!("Service unhealthy: {}", reason)));
            }
            Err(e) => {
                println!("{}", palette.error(&format!("Health check failed: {}", e)));
            }
        }
    }
}

/// Format seconds as e.g. "1h 02m 05s"
pub fn format_duration(total: u64) -> String {
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Command::parse("/help"), Command::Help);
        assert_eq!(Command::parse("  /clear "), Command::Clear);
        assert_eq!(Command::parse("/exit"), Command::Quit);
        assert_eq!(Command::parse("/sources"), Command::Sources);
    }

    #[test]
    fn test_parse_theme() {
        assert_eq!(Command::parse("/theme"), Command::Theme(None));
        assert_eq!(Command::parse("/theme light"), Command::Theme(Some(Theme::Light)));
        assert_eq!(Command::parse("/dark"), Command::Theme(Some(Theme::Dark)));
        assert!(matches!(Command::parse("/theme neon"), Command::Usage(_)));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            Command::parse("/frobnicate now"),
            Command::Unknown("/frobnicate".into())
        );
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(5), "5s");
        assert_eq!(format_duration(65), "1m 05s");
        assert_eq!(format_duration(3725), "1h 02m 05s");
    }
}
