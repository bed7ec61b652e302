//! Error types for transcript construction and I/O.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for transcript operations.
pub type TranscriptResult<T> = Result<T, TranscriptError>;

/// Errors that can occur while building, querying, or storing a transcription.
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("Invalid transcription: {0}")]
    Invalid(String),

    #[error("Invalid time range: {start} to {end} (transcript ends at {end_time})")]
    InvalidTimeRange { start: f64, end: f64, end_time: f64 },

    #[error("Invalid transcript path: {0}")]
    InvalidPath(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TranscriptError {
    /// Create an invalid-transcription error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}
