pub mod audio;
pub mod config;
pub mod messages;
pub mod platform;
pub mod session;
pub mod ui;
pub mod utils;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("Recorder error: {0}")]
    RecorderError(String),

    #[error("Playback error: {0}")]
    PlaybackError(String),

    #[error("No audio loaded for playback")]
    PlaybackUnavailable,

    #[error("Failed to load audio {path}: {reason}")]
    LoadError { path: String, reason: String },

    #[error("Permission denied: {0}")]
    PermissionError(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("IO error: {0}")]
    IOError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<std::io::Error> for ChatError {
    fn from(e: std::io::Error) -> Self {
        ChatError::IOError(e.to_string())
    }
}

impl ChatError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Hardware/device errors may require user intervention
            ChatError::AudioDeviceError(_) => false,
            // A failed take can simply be retried
            ChatError::RecorderError(_) => true,
            ChatError::PlaybackError(_) => true,
            ChatError::PlaybackUnavailable => false,
            ChatError::LoadError { .. } => false,
            ChatError::PermissionError(_) => false,
            ChatError::InvalidState(_) => true,
            ChatError::IOError(_) => false,
            ChatError::ConfigError(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            ChatError::AudioDeviceError(_) => {
                "Audio device error. Please check your microphone/speakers.".to_string()
            }
            ChatError::RecorderError(_) => "Recording failed. Please try again.".to_string(),
            ChatError::PlaybackError(_) => "Playback failed. Please try again.".to_string(),
            ChatError::PlaybackUnavailable => "This voice message can't be played.".to_string(),
            ChatError::LoadError { .. } => "Couldn't open this voice message.".to_string(),
            ChatError::PermissionError(_) => {
                "Microphone or storage access was denied. Recording may not work.".to_string()
            }
            ChatError::InvalidState(_) => "That action isn't available right now.".to_string(),
            ChatError::IOError(_) => "File system error occurred.".to_string(),
            ChatError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
