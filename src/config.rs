//! Application-level configuration loading: game lengths and chat settings.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "BAOBAB_GOLF_CONFIG_PATH";

const DEFAULT_HOLE_COUNTS: [u8; 2] = [9, 18];
const DEFAULT_CHAT_CHANNEL: &str = "global";
const DEFAULT_CHAT_HISTORY_LIMIT: usize = 100;
const DEFAULT_CHAT_MESSAGE_MAX_LEN: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    allowed_hole_counts: Vec<u8>,
    chat_channel: String,
    chat_history_limit: usize,
    chat_message_max_len: usize,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        hole_counts = ?app_config.allowed_hole_counts,
                        channel = %app_config.chat_channel,
                        "loaded application config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a configuration document. Missing keys keep their default value.
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }

    /// Game lengths a scorekeeper may pick when starting a game.
    pub fn allowed_hole_counts(&self) -> &[u8] {
        &self.allowed_hole_counts
    }

    /// Whether `holes` is an accepted game length.
    pub fn accepts_hole_count(&self, holes: u8) -> bool {
        self.allowed_hole_counts.contains(&holes)
    }

    /// Channel used for the shared chat.
    pub fn chat_channel(&self) -> &str {
        &self.chat_channel
    }

    /// Upper bound on the number of chat messages returned at once.
    pub fn chat_history_limit(&self) -> usize {
        self.chat_history_limit
    }

    /// Maximum length of a chat message, in characters.
    pub fn chat_message_max_len(&self) -> usize {
        self.chat_message_max_len
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            allowed_hole_counts: DEFAULT_HOLE_COUNTS.to_vec(),
            chat_channel: DEFAULT_CHAT_CHANNEL.to_string(),
            chat_history_limit: DEFAULT_CHAT_HISTORY_LIMIT,
            chat_message_max_len: DEFAULT_CHAT_MESSAGE_MAX_LEN,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    hole_counts: Option<Vec<u8>>,
    chat: RawChatConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawChatConfig {
    channel: Option<String>,
    history_limit: Option<usize>,
    max_message_length: Option<usize>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        let allowed_hole_counts = value
            .hole_counts
            .map(|counts| counts.into_iter().filter(|n| *n > 0).collect::<Vec<_>>())
            .filter(|counts| !counts.is_empty())
            .unwrap_or(defaults.allowed_hole_counts);

        Self {
            allowed_hole_counts,
            chat_channel: value
                .chat
                .channel
                .filter(|channel| !channel.trim().is_empty())
                .unwrap_or(defaults.chat_channel),
            chat_history_limit: value
                .chat
                .history_limit
                .filter(|limit| *limit > 0)
                .unwrap_or(defaults.chat_history_limit),
            chat_message_max_len: value
                .chat
                .max_message_length
                .filter(|len| *len > 0)
                .unwrap_or(defaults.chat_message_max_len),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
