//! ANSI colors and the dark/light themes
//!
//! Simple, tasteful colors that work on most terminals. The dark theme uses
//! bright foregrounds, the light theme sticks to deeper shades that stay
//! readable on a white background.

use std::fmt;
use std::str::FromStr;

/// ANSI escape codes
pub mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const ITALIC: &str = "\x1b[3m";
    pub const UNDERLINE: &str = "\x1b[4m";
    pub const STRIKE: &str = "\x1b[9m";

    // Colors
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";
    pub const BLACK: &str = "\x1b[30m";
    pub const GRAY: &str = "\x1b[90m";

    // Bright variants
    pub const BRIGHT_RED: &str = "\x1b[91m";
    pub const BRIGHT_GREEN: &str = "\x1b[92m";
    pub const BRIGHT_YELLOW: &str = "\x1b[93m";
    pub const BRIGHT_BLUE: &str = "\x1b[94m";
    pub const BRIGHT_MAGENTA: &str = "\x1b[95m";
    pub const BRIGHT_CYAN: &str = "\x1b[96m";
    pub const BRIGHT_WHITE: &str = "\x1b[97m";
}

use ansi::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            Theme::Dark => Palette {
                accent: BRIGHT_MAGENTA,
                text: BRIGHT_WHITE,
                muted: GRAY,
                user: BRIGHT_CYAN,
                bot: BRIGHT_GREEN,
                heading: BRIGHT_YELLOW,
                code: BRIGHT_BLUE,
                link: BRIGHT_CYAN,
                error: BRIGHT_RED,
                warning: YELLOW,
                success: GREEN,
            },
            Theme::Light => Palette {
                accent: MAGENTA,
                text: BLACK,
                muted: DIM,
                user: BLUE,
                bot: GREEN,
                heading: MAGENTA,
                code: BLUE,
                link: BLUE,
                error: RED,
                warning: YELLOW,
                success: GREEN,
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(format!("unknown theme '{}' (expected dark or light)", other)),
        }
    }
}

/// Escape codes for each role in the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub accent: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
    pub user: &'static str,
    pub bot: &'static str,
    pub heading: &'static str,
    pub code: &'static str,
    pub link: &'static str,
    pub error: &'static str,
    pub warning: &'static str,
    pub success: &'static str,
}

impl Palette {
    pub fn paint(&self, color: &str, text: &str) -> String {
        format!("{}{}{}", color, text, RESET)
    }

    pub fn error(&self, msg: &str) -> String {
        self.paint(self.error, msg)
    }

    pub fn warning(&self, msg: &str) -> String {
        self.paint(self.warning, msg)
    }

    pub fn success(&self, msg: &str) -> String {
        self.paint(self.success, msg)
    }

    pub fn status(&self, msg: &str) -> String {
        self.paint(self.muted, msg)
    }

    /// Label printed above a message
    pub fn speaker(&self, color: &str, name: &str) -> String {
        format!("{}{}{}{}", BOLD, color, name, RESET)
    }

    /// Format a horizontal separator
    pub fn separator(&self, width: usize) -> String {
        format!("{}{}{}", self.muted, "─".repeat(width), RESET)
    }

    /// Format startup banner line
    pub fn banner_line(&self, label: &str, value: &str) -> String {
        format!("{}{:<12}{} {}", self.muted, label, RESET, value)
    }

    /// Format startup banner with accent
    pub fn banner_accent(&self, text: &str) -> String {
        format!("{}{}{}{}", BOLD, self.accent, text, RESET)
    }

    /// Error banner, framed so it stands out from answers
    pub fn banner(&self, msg: &str) -> String {
        format!("{}{}[!] {}{}", BOLD, self.error, msg, RESET)
    }
}
