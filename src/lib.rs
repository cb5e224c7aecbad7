pub mod analysis;
pub mod audio;
pub mod config;
pub mod enrich;
pub mod playback;
pub mod recording;
pub mod render;
pub mod store;
pub mod utils;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum VoxnoteError {
    #[error("Microphone access denied: {0}")]
    PermissionDenied(String),

    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Note not found: {0}")]
    NotFound(i64),

    #[error("Enrichment error: {0}")]
    EnrichmentError(String),

    #[error("Audio processing error: {0}")]
    AudioProcessingError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),
}

impl From<std::io::Error> for VoxnoteError {
    fn from(e: std::io::Error) -> Self {
        VoxnoteError::StorageError(e.to_string())
    }
}

impl VoxnoteError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // The user can grant access and retry
            VoxnoteError::PermissionDenied(_) => true,
            VoxnoteError::AudioDeviceError(_) => false,
            // The note fails to appear; nothing is corrupted
            VoxnoteError::StorageError(_) => true,
            // Callers treat a missing note as a no-op condition
            VoxnoteError::NotFound(_) => true,
            // Enrichment degrades to fallback content
            VoxnoteError::EnrichmentError(_) => true,
            VoxnoteError::AudioProcessingError(_) => true,
            VoxnoteError::ConfigError(_) => false,
            VoxnoteError::ChannelError(_) => false,
        }
    }

    /// Get a user-friendly description for transient notifications
    pub fn user_message(&self) -> String {
        match self {
            VoxnoteError::PermissionDenied(_) => {
                "Microphone access was denied. Please allow access and try again.".to_string()
            }
            VoxnoteError::AudioDeviceError(_) => {
                "Audio device error. Please check your microphone/speakers.".to_string()
            }
            VoxnoteError::StorageError(_) => {
                "Could not save the note. Please check local storage.".to_string()
            }
            VoxnoteError::NotFound(_) => "That note no longer exists.".to_string(),
            VoxnoteError::EnrichmentError(_) => {
                "Transcription is unavailable. The note was saved without it.".to_string()
            }
            VoxnoteError::AudioProcessingError(_) => {
                "Audio processing failed. Please try again.".to_string()
            }
            VoxnoteError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            VoxnoteError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, VoxnoteError>;
