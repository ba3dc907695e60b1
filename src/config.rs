//! Application configuration.

use crate::error::ErrorLocation;
use crate::game::DEFAULT_COMPUTER_DELAY;
use crate::rooms::{DEFAULT_POLL_INTERVAL, SyncConfig};
use derive_getters::Getters;
use derive_more::{Display, Error};
use neon_tictactoe::Difficulty;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Settings read from `neon_ttt.toml`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct NeonConfig {
    /// Display name shown to the other participant of a room.
    player_name: String,

    /// Directory holding shared room records.
    store_dir: PathBuf,

    /// Base URL of share links.
    share_base_url: String,

    /// Milliseconds between room polls.
    poll_interval_ms: u64,

    /// Milliseconds the computer waits before answering.
    computer_delay_ms: u64,

    /// Default strength of the computer.
    difficulty: Difficulty,
}

impl Default for NeonConfig {
    fn default() -> Self {
        Self {
            player_name: String::new(),
            store_dir: PathBuf::from(".neon-ttt/rooms"),
            share_base_url: "http://localhost:3000".to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            computer_delay_ms: DEFAULT_COMPUTER_DELAY.as_millis() as u64,
            difficulty: Difficulty::default(),
        }
    }
}

impl NeonConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(store_dir = %config.store_dir.display(), "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Overrides the player name.
    pub fn set_player_name(&mut self, name: impl Into<String>) {
        self.player_name = name.into();
    }

    /// Overrides the store directory.
    pub fn set_store_dir(&mut self, dir: impl Into<PathBuf>) {
        self.store_dir = dir.into();
    }

    /// Overrides the default difficulty.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// Delay before computer replies.
    pub fn computer_delay(&self) -> Duration {
        Duration::from_millis(self.computer_delay_ms)
    }

    /// Room synchronization settings.
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig::new(
            Duration::from_millis(self.poll_interval_ms.max(1)),
            self.share_base_url.clone(),
        )
    }
}

/// Configuration file could not be read or parsed.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}", message, location)]
pub struct ConfigError {
    /// What went wrong.
    pub message: String,
    /// Where it was raised.
    pub location: ErrorLocation,
}

impl ConfigError {
    /// Creates an error located at the caller.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        Self {
            message,
            location: ErrorLocation::caller(),
        }
    }
}
