//! Configuration file support for ask-chat
//!
//! Loads config from ~/.ask-chat/config.toml. Values given on the command
//! line or through the environment win over the file.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::repl::colors::Theme;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:10000";

/// Contents of config.toml
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Base URL of the ask service
    pub endpoint: Option<String>,

    /// Documents to retrieve per question
    pub top_k: Option<u32>,

    /// Whole-request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// "dark" or "light"
    pub theme: Option<String>,

    /// Whether to print cited sources under answers
    pub show_sources: Option<bool>,

    /// Where to keep readline history
    pub history_file: Option<PathBuf>,
}

impl Config {
    /// Load config from ~/.ask-chat/config.toml
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Load from an explicit path, falling back to defaults on any problem
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Overrides coming from the command line (and clap's env fallbacks)
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub top_k: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub theme: Option<Theme>,
    pub no_sources: bool,
}

/// Fully resolved settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub endpoint: String,
    pub top_k: Option<u32>,
    pub timeout: Option<Duration>,
    pub theme: Theme,
    pub show_sources: bool,
    pub history_path: PathBuf,
}

impl Settings {
    /// Resolve values: CLI args > env vars (handled by clap) > config file > defaults
    pub fn resolve(overrides: Overrides, config: Config) -> Self {
        let endpoint = overrides
            .endpoint
            .or(config.endpoint)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let theme = overrides.theme.unwrap_or_else(|| {
            config
                .theme
                .as_deref()
                .and_then(|t| match t.parse() {
                    Ok(theme) => Some(theme),
                    Err(e) => {
                        tracing::warn!("Ignoring theme from config: {}", e);
                        None
                    }
                })
                .unwrap_or_default()
        });

        let show_sources = !overrides.no_sources && config.show_sources.unwrap_or(true);

        Self {
            endpoint,
            top_k: overrides.top_k.or(config.top_k),
            timeout: overrides
                .timeout_secs
                .or(config.timeout_secs)
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            theme,
            show_sources,
            history_path: config.history_file.unwrap_or_else(default_history_path),
        }
    }
}

/// Directory holding config.toml, .env and history
pub fn config_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_default().join(".ask-chat")
}

/// Get the config file path
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

fn default_history_path() -> PathBuf {
    config_dir().join("history")
}
