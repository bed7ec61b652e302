//! Sentence, word, and character elements of a transcription.

use serde::{Deserialize, Serialize};

/// Anything with a start and end time in seconds.
pub trait Timed {
    /// Start time in seconds.
    fn start_time(&self) -> f64;

    /// End time in seconds.
    fn end_time(&self) -> f64;

    /// Duration in seconds.
    fn duration(&self) -> f64 {
        (self.end_time() - self.start_time()).max(0.0)
    }

    /// Whether `time` falls inside `[start_time, end_time]`.
    fn contains_time(&self, time: f64) -> bool {
        self.start_time() <= time && time <= self.end_time()
    }
}

/// A single character of the transcript text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// The character itself.
    pub text: char,
    /// Start time in seconds.
    pub start_time: f64,
    /// End time in seconds.
    pub end_time: f64,
    /// Index of the owning word (`None` for separators).
    pub word_index: Option<usize>,
    /// Index of the owning sentence (`None` for separators).
    pub sentence_index: Option<usize>,
    /// Speaker label reported by diarization, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<u32>,
}

/// A word: a maximal run of non-whitespace characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
    /// First character offset in the full text.
    pub start_char: usize,
    /// One past the last character offset in the full text.
    pub end_char: usize,
    /// Index of the sentence containing this word.
    pub sentence_index: usize,
}

/// A sentence: a contiguous run of words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
    pub start_char: usize,
    pub end_char: usize,
    /// First word index.
    pub start_word: usize,
    /// One past the last word index.
    pub end_word: usize,
}

impl Sentence {
    /// Word indices owned by this sentence.
    pub fn word_range(&self) -> std::ops::Range<usize> {
        self.start_word..self.end_word
    }

    /// Number of words in this sentence.
    pub fn word_count(&self) -> usize {
        self.end_word - self.start_word
    }
}

impl Timed for Character {
    fn start_time(&self) -> f64 {
        self.start_time
    }

    fn end_time(&self) -> f64 {
        self.end_time
    }
}

impl Timed for Word {
    fn start_time(&self) -> f64 {
        self.start_time
    }

    fn end_time(&self) -> f64 {
        self.end_time
    }
}

impl Timed for Sentence {
    fn start_time(&self) -> f64 {
        self.start_time
    }

    fn end_time(&self) -> f64 {
        self.end_time
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl std::fmt::Display for Sentence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
