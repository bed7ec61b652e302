//! Error types for clip segmentation.

use thiserror::Error;

/// Result type for segmentation operations.
pub type SegmentationResult<T> = Result<T, SegmentationError>;

/// Coarse error category, for callers that branch on the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A configuration value is out of range or inconsistent.
    ConfigurationInvalid,
    /// The transcript is too small to tile.
    InsufficientData,
    /// Tiling succeeded but no clip survived the duration policy.
    NoSegmentsFound,
}

impl ErrorKind {
    /// Stable lowercase label, used for metrics and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ConfigurationInvalid => "configuration_invalid",
            ErrorKind::InsufficientData => "insufficient_data",
            ErrorKind::NoSegmentsFound => "no_segments_found",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during boundary detection and clip selection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SegmentationError {
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfig { field: &'static str, message: String },

    #[error("Not enough blocks to tile: got {blocks}, need at least 3")]
    InsufficientData { blocks: usize },

    #[error("Transcript too short: {words} words is fewer than block size {block_size}")]
    TranscriptTooShort { words: usize, block_size: usize },

    #[error("No clips found: {candidates} candidates, none at least {min_duration}s long")]
    NoSegmentsFound { candidates: usize, min_duration: f64 },
}

impl SegmentationError {
    /// Create an invalid configuration error.
    pub fn invalid_config(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            message: message.into(),
        }
    }

    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConfig { .. } => ErrorKind::ConfigurationInvalid,
            Self::InsufficientData { .. } | Self::TranscriptTooShort { .. } => {
                ErrorKind::InsufficientData
            }
            Self::NoSegmentsFound { .. } => ErrorKind::NoSegmentsFound,
        }
    }

    /// Raised by the tiling stages (config, blocking, detection).
    pub fn is_tiling_error(&self) -> bool {
        !self.is_clip_selection_error()
    }

    /// Raised when selection leaves no usable clip.
    pub fn is_clip_selection_error(&self) -> bool {
        matches!(self, Self::NoSegmentsFound { .. })
    }
}
