//! Rustyline helper for REPL with tab completion and hints

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::borrow::Cow;

/// Slash commands for tab completion
pub const SLASH_COMMANDS: &[&str] = &[
    "/help",
    "/version",
    "/clear",
    "/history",
    "/theme",
    "/dark",
    "/light",
    "/sources",
    "/health",
    "/quit",
    "/exit",
];

/// Custom helper for rustyline with completion and hints
pub struct ChatHelper {
    hinter: HistoryHinter,
}

impl ChatHelper {
    pub fn new() -> Self {
        Self {
            hinter: HistoryHinter::new(),
        }
    }
}

/// Slash commands starting with the first word of `line`
pub fn complete_command(line: &str) -> Vec<&'static str> {
    let word = line.split_whitespace().next().unwrap_or("");
    SLASH_COMMANDS
        .iter()
        .copied()
        .filter(|cmd| cmd.starts_with(word))
        .collect()
}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // Only complete slash commands at the start of the line
        if line.starts_with('/') && pos <= line.find(' ').unwrap_or(line.len()) {
            let matches = complete_command(line)
                .into_iter()
                .map(|cmd| Pair {
                    display: cmd.to_string(),
                    replacement: cmd.to_string(),
                })
                .collect();
            Ok((0, matches))
        } else {
            Ok((pos, vec![]))
        }
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        // Show history hints for questions, not commands
        if !line.starts_with('/') {
            self.hinter.hint(line, pos, ctx)
        } else {
            None
        }
    }
}

impl Highlighter for ChatHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("\x1b[2m{}\x1b[0m", hint))
    }
}

impl Validator for ChatHelper {}

impl Helper for ChatHelper {}
