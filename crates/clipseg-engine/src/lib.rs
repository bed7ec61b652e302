#![deny(unreachable_patterns)]
//! Lexical-cohesion clip detection for time-aligned transcripts.
//!
//! This crate provides:
//! - TextTiling-style topic boundary detection over word blocks
//! - Sentence-aligned mapping of boundaries to cut times
//! - Duration-bounded clip selection and ranking
//! - Multi-scale candidate pooling across block sizes
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ Transcript   │───►│ Blocker      │───►│ Cohesion     │
//! │ (words)      │    │ (pseudosent.)│    │ (gap scores) │
//! └──────────────┘    └──────────────┘    └──────────────┘
//!                                                │
//!                                                ▼
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ Selector     │◄───│ Mapper       │◄───│ Boundary     │
//! │ (clips)      │    │ (cut times)  │    │ (depth/cut)  │
//! └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use clipseg_engine::{ClipFinder, SegmenterConfig};
//! use clipseg_models::Transcription;
//!
//! let transcription = Transcription::from_json_file("talk.json")?;
//! let finder = ClipFinder::new(SegmenterConfig::short_form())?;
//!
//! for clip in finder.find_top_clips(&transcription, 5)? {
//!     println!("{} ({:.2})", clip.time_range_label(), clip.score);
//! }
//! ```

pub mod blocker;
pub mod boundary;
pub mod cohesion;
pub mod config;
pub mod error;
pub mod finder;
pub mod mapper;
pub mod metrics;
pub mod multiscale;
pub mod selector;
pub mod tokenize;

#[cfg(test)]
mod tests;

pub use blocker::Block;
pub use boundary::BoundaryCandidate;
pub use config::{CutoffPolicy, SegmenterConfig, SimilarityMetric, SmoothingMethod};
pub use error::{ErrorKind, SegmentationError, SegmentationResult};
pub use finder::{ClipFinder, TilingOutcome};
pub use mapper::Cut;
pub use multiscale::MultiScaleFinder;
pub use selector::{compute_clip_stats, ClipStats};
