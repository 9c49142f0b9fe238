use thiserror::Error;

use crate::widget::ObjectId;

#[derive(Error, Debug)]
pub enum SoundEventError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Pending queue is full ({capacity} records)")]
    QueueFull { capacity: usize },

    #[error("Source object {0} was destroyed while its record was queued")]
    StaleReference(ObjectId),

    #[error("Playback failed: {0}")]
    Playback(#[from] PlaybackError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors reported by a [`crate::PlaybackPort`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("Playback backend error: {0}")]
    Backend(String),

    #[error("Playback unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, SoundEventError>;
