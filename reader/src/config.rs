//! reader configuration management.

use serde::{Deserialize, Serialize};
use speech_client::{SpeechConfig, clamp_rate};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ReaderError, Result};
use crate::playback::PlaybackOptions;
use crate::summary::DEFAULT_KEY_POINTS;
use crate::text::DEFAULT_MAX_CHUNK_LEN;

const DEFAULT_SPEED: f32 = 1.0;
const DEFAULT_SETTLE_DELAY_MS: u64 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Speaking rate (0.5-2.0)
    #[serde(default = "default_speed")]
    pub speed: f32,

    /// Maximum chunk size in characters
    #[serde(default = "default_max_chunk_len")]
    pub max_chunk_len: usize,

    /// Delay between chunks in milliseconds
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Number of sentences in a summary
    #[serde(default = "default_key_points")]
    pub key_points: usize,

    /// Split words joined by text recognition (`wordWord` -> `word Word`)
    #[serde(default)]
    pub repair_ocr_joins: bool,

    #[serde(default)]
    pub speech: SpeechConfig,
}

fn default_speed() -> f32 {
    DEFAULT_SPEED
}

fn default_max_chunk_len() -> usize {
    DEFAULT_MAX_CHUNK_LEN
}

fn default_settle_delay_ms() -> u64 {
    DEFAULT_SETTLE_DELAY_MS
}

fn default_key_points() -> usize {
    DEFAULT_KEY_POINTS
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            max_chunk_len: default_max_chunk_len(),
            settle_delay_ms: default_settle_delay_ms(),
            key_points: default_key_points(),
            repair_ocr_joins: false,
            speech: SpeechConfig::default(),
        }
    }
}

impl ReaderConfig {
    /// Get the config file path: ~/.config/cli-programs/reader.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| ReaderError::Config("cannot locate home directory".into()))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("cli-programs")
            .join("reader.toml"))
    }

    /// Load config from file, returning default if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: ReaderConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Set the default speaking rate, clamped to the supported range.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = clamp_rate(speed);
    }

    /// Playback tuning derived from this config.
    pub fn playback_options(&self) -> PlaybackOptions {
        PlaybackOptions::new()
            .with_max_chunk_len(self.max_chunk_len)
            .with_settle_delay(Duration::from_millis(self.settle_delay_ms))
            .with_rate(self.speed)
    }
}
