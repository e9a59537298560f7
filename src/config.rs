//! Configuration for the chat screen
//!
//! Loaded from a TOML file; every field has a default so a partial (or
//! missing) file is fine.

use crate::platform::Platform;
use crate::{ChatError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

const APP_DIR: &str = "voice-chat";

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Title shown in the header
    pub title: String,
    /// Greeting shown while the conversation is empty
    pub greeting: String,
    /// Decorative quick-reply chips under the greeting
    pub quick_replies: Vec<String>,
    /// Use the dark color theme
    pub dark_theme: bool,
    pub recording: RecordingConfig,
    pub timing: TimingConfig,
    pub waveform: WaveformConfig,
    /// Which platform's permission set to request
    pub platform: Platform,
}

/// Where and how takes are stored
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    /// Directory new takes are written to
    pub dir: PathBuf,
    /// Remove the file when a pending take is discarded
    pub delete_discarded: bool,
}

/// Polling periods
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Elapsed-time counter period while recording
    pub recording_tick_ms: u64,
    /// Position sampling period while playing
    pub playback_poll_ms: u64,
}

/// Static waveform rendering
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WaveformConfig {
    /// Number of bars drawn per voice message
    pub bars: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            title: "Travel GPT".to_string(),
            greeting: "Hi there! 👋 My name is Tratoli. How can I assist you today?".to_string(),
            quick_replies: ["Holiday", "Flight", "Transfer", "Activity", "Hotel"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            dark_theme: false,
            recording: RecordingConfig::default(),
            timing: TimingConfig::default(),
            waveform: WaveformConfig::default(),
            platform: Platform::Desktop,
        }
    }
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            dir: default_recording_dir(),
            delete_discarded: false,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            recording_tick_ms: 1000,
            playback_poll_ms: 1000,
        }
    }
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self { bars: 48 }
    }
}

impl TimingConfig {
    pub fn recording_tick(&self) -> Duration {
        Duration::from_millis(self.recording_tick_ms)
    }

    pub fn playback_poll(&self) -> Duration {
        Duration::from_millis(self.playback_poll_ms)
    }
}

/// Platform-appropriate directory for recordings
pub fn default_recording_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
        .join("recordings")
}

/// Location of the user configuration file, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

impl ChatConfig {
    /// Load a configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ChatError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml(&content)?;
        info!("[CONFIG] Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ChatConfig = toml::from_str(content)
            .map_err(|e| ChatError::ConfigError(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the user configuration file if it exists, defaults otherwise
    pub fn load_or_default() -> Result<Self> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => {
                debug!("[CONFIG] No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.timing.recording_tick_ms == 0 {
            return Err(ChatError::ConfigError(
                "timing.recording_tick_ms must be greater than zero".to_string(),
            ));
        }
        if self.timing.playback_poll_ms == 0 {
            return Err(ChatError::ConfigError(
                "timing.playback_poll_ms must be greater than zero".to_string(),
            ));
        }
        if !(8..=512).contains(&self.waveform.bars) {
            return Err(ChatError::ConfigError(format!(
                "waveform.bars must be between 8 and 512, got {}",
                self.waveform.bars
            )));
        }
        if self.recording.dir.as_os_str().is_empty() {
            return Err(ChatError::ConfigError(
                "recording.dir must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Use a different recording directory
    pub fn with_recording_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.recording.dir = dir.into();
        self
    }

    /// Target a specific platform's permission set
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }
}
