//! Shared data models for topic-based clip detection.
//!
//! This crate provides Serde-serializable types for:
//! - Time-aligned transcripts (sentences, words, characters)
//! - Clip segments produced by the segmentation engine
//! - Timestamp parsing and formatting

pub mod segment;
pub mod timestamp;
pub mod transcript;

// Re-export common types
pub use segment::Segment;
pub use timestamp::{format_range, format_seconds, parse_timestamp, TimestampError};
pub use transcript::{
    Character, RawCharacter, RawTranscription, SearchMode, Sentence, Timed, TimedWord,
    TranscriptError, TranscriptMetadata, TranscriptResult, Transcription, Word,
};
