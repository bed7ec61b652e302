//! Clip segment model.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::timestamp::format_range;
use crate::transcript::Timed;

/// A topically coherent clip candidate: a contiguous run of sentences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Segment {
    /// Start time in seconds
    pub start_time: f64,

    /// End time in seconds
    pub end_time: f64,

    /// First sentence of the clip
    pub start_sentence: usize,

    /// One past the last sentence of the clip
    pub end_sentence: usize,

    /// First character offset in the transcript text
    pub start_char: usize,

    /// One past the last character offset in the transcript text
    pub end_char: usize,

    /// Ranking score in [0, 1]
    #[serde(default)]
    pub score: f64,

    /// Longer than the configured maximum; trimming is left to the caller
    #[serde(default)]
    pub needs_trim: bool,
}

impl Segment {
    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Number of sentences in the clip.
    pub fn sentence_count(&self) -> usize {
        self.end_sentence.saturating_sub(self.start_sentence)
    }

    /// Whether the two clips share any time.
    pub fn overlaps(&self, other: &Segment) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }

    /// Human-readable range, e.g. `00:01:20 - 00:02:00`.
    pub fn time_range_label(&self) -> String {
        format_range(self.start_time, self.end_time)
    }
}

impl Timed for Segment {
    fn start_time(&self) -> f64 {
        self.start_time
    }

    fn end_time(&self) -> f64 {
        self.end_time
    }
}
