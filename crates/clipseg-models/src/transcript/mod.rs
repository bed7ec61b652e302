//! Time-aligned transcript hierarchy.
//!
//! A [`Transcription`] is an ordered `Sentence → Word → Character` hierarchy
//! stored as flat index-addressed arrays: sentences own a word index range,
//! words record their sentence index, and characters record both.
//!
//! # Construction
//!
//! ```rust
//! use clipseg_models::Transcription;
//!
//! let transcription = Transcription::from_sentence_spans(&[
//!     (0.0, 4.0, "Rust has no garbage collector."),
//!     (4.0, 7.5, "Ownership decides when memory is freed."),
//! ])
//! .unwrap();
//!
//! assert_eq!(transcription.sentences().len(), 2);
//! assert_eq!(transcription.end_time(), 7.5);
//! ```
//!
//! Stored character-level transcriptions load with
//! [`Transcription::from_json_file`] / [`Transcription::from_raw`].

mod builder;
mod elements;
mod error;
mod raw;
mod search;

use std::path::Path;

use chrono::{DateTime, Utc};

use builder::{assemble, PendingWord, TIME_TOLERANCE};

pub use elements::{Character, Sentence, Timed, Word};
pub use error::{TranscriptError, TranscriptResult};
pub use raw::{RawCharacter, RawTranscription, TIME_CREATED_FORMAT};
pub use search::{find_index, SearchMode};

/// Provenance of a transcription.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptMetadata {
    /// Speech-to-text software that produced the transcription.
    pub source_software: String,
    /// When the transcription was created.
    pub time_created: DateTime<Utc>,
    /// Language code of the transcription.
    pub language: String,
    /// Number of speakers found by diarization, if it ran.
    pub num_speakers: Option<u32>,
}

impl Default for TranscriptMetadata {
    fn default() -> Self {
        Self {
            source_software: "clipseg".to_string(),
            time_created: Utc::now(),
            language: "und".to_string(),
            num_speakers: None,
        }
    }
}

/// A word with its own timing, used to build transcriptions directly.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedWord {
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
}

impl TimedWord {
    pub fn new(text: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            text: text.into(),
            start_time,
            end_time,
        }
    }
}

/// A time-aligned transcription. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcription {
    metadata: TranscriptMetadata,
    text: String,
    characters: Vec<Character>,
    words: Vec<Word>,
    sentences: Vec<Sentence>,
}

impl Transcription {
    /// Build a transcription from sentences of timed words.
    ///
    /// Word characters are spread uniformly over each word's span.
    pub fn from_timed_words(sentences: Vec<Vec<TimedWord>>) -> TranscriptResult<Self> {
        let pending = sentences
            .into_iter()
            .map(|words| {
                words
                    .into_iter()
                    .map(|w| {
                        if !(w.start_time.is_finite() && w.end_time.is_finite())
                            || w.end_time + TIME_TOLERANCE < w.start_time
                        {
                            return Err(TranscriptError::invalid(format!(
                                "word '{}' has invalid span {}..{}",
                                w.text, w.start_time, w.end_time
                            )));
                        }
                        Ok(PendingWord::spread(&w.text, w.start_time, w.end_time))
                    })
                    .collect::<TranscriptResult<Vec<_>>>()
            })
            .collect::<TranscriptResult<Vec<_>>>()?;

        assemble(TranscriptMetadata::default(), pending)
    }

    /// Build a transcription from sentence-level timings, e.g. caption cues.
    ///
    /// Each sentence's words are spread over its span in proportion to their
    /// character counts.
    pub fn from_sentence_spans(spans: &[(f64, f64, &str)]) -> TranscriptResult<Self> {
        let mut sentences = Vec::with_capacity(spans.len());

        for (index, &(start, end, text)) in spans.iter().enumerate() {
            if !(start.is_finite() && end.is_finite()) || end < start {
                return Err(TranscriptError::invalid(format!(
                    "sentence {} has invalid span {}..{}",
                    index, start, end
                )));
            }

            let tokens: Vec<&str> = text.split_whitespace().collect();
            if tokens.is_empty() {
                return Err(TranscriptError::invalid(format!(
                    "sentence {} has no words",
                    index
                )));
            }

            let total_chars: usize = tokens.iter().map(|t| t.chars().count()).sum();
            let per_char = (end - start) / total_chars as f64;

            let mut offset = 0usize;
            let mut words = Vec::with_capacity(tokens.len());
            for (i, token) in tokens.iter().enumerate() {
                let len = token.chars().count();
                let word_start = start + per_char * offset as f64;
                offset += len;
                let word_end = if i + 1 == tokens.len() {
                    end
                } else {
                    start + per_char * offset as f64
                };
                words.push(PendingWord::spread(token, word_start, word_end));
            }
            sentences.push(words);
        }

        assemble(TranscriptMetadata::default(), sentences)
    }

    /// Build a transcription from a stored character-level record.
    pub fn from_raw(raw: RawTranscription) -> TranscriptResult<Self> {
        let metadata = TranscriptMetadata {
            source_software: raw.source_software,
            time_created: raw::parse_time_created(&raw.time_created)?,
            language: raw.language,
            num_speakers: raw.num_speakers,
        };
        let sentences = raw::group_characters(&raw.char_info)?;
        assemble(metadata, sentences)
    }

    /// Parse a stored transcription from JSON text.
    pub fn from_json_str(json: &str) -> TranscriptResult<Self> {
        let raw: RawTranscription = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Load a stored transcription from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> TranscriptResult<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&data)
    }

    /// Replace the provenance metadata.
    pub fn with_metadata(mut self, metadata: TranscriptMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Convert back to the stored character-level record.
    ///
    /// Whitespace is normalized to single spaces between words.
    pub fn to_raw(&self) -> RawTranscription {
        RawTranscription {
            source_software: self.metadata.source_software.clone(),
            time_created: raw::format_time_created(&self.metadata.time_created),
            language: self.metadata.language.clone(),
            num_speakers: self.metadata.num_speakers,
            char_info: self
                .characters
                .iter()
                .map(|c| RawCharacter {
                    text: c.text.to_string(),
                    start_time: Some(c.start_time),
                    end_time: Some(c.end_time),
                    speaker: c.speaker,
                })
                .collect(),
        }
    }

    /// Serialize to the stored JSON format.
    pub fn to_json_string(&self) -> TranscriptResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_raw())?)
    }

    /// Store as a `.json` file, replacing any existing file.
    ///
    /// The parent directory must already exist.
    pub fn store_as_json_file(&self, path: impl AsRef<Path>) -> TranscriptResult<()> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if !is_json {
            return Err(TranscriptError::InvalidPath(path.to_path_buf()));
        }

        let parent_exists = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.is_dir(),
            _ => true,
        };
        if !parent_exists {
            return Err(TranscriptError::InvalidPath(path.to_path_buf()));
        }

        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    pub fn metadata(&self) -> &TranscriptMetadata {
        &self.metadata
    }

    /// Full text, words joined by single spaces.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// Transcriptions always start at the beginning of the media.
    pub fn start_time(&self) -> f64 {
        0.0
    }

    /// End of the last timed element.
    pub fn end_time(&self) -> f64 {
        self.words.last().map(|w| w.end_time).unwrap_or(0.0)
    }

    /// Total duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time()
    }

    /// Index of the character at `time`.
    pub fn find_char_index(&self, time: f64, mode: SearchMode) -> usize {
        find_index(&self.characters, time, mode)
    }

    /// Index of the word at `time`.
    pub fn find_word_index(&self, time: f64, mode: SearchMode) -> usize {
        find_index(&self.words, time, mode)
    }

    /// Index of the sentence at `time`.
    pub fn find_sentence_index(&self, time: f64, mode: SearchMode) -> usize {
        find_index(&self.sentences, time, mode)
    }

    /// Words overlapping `[start, end]`.
    pub fn words_in_range(&self, start: f64, end: f64) -> TranscriptResult<&[Word]> {
        self.validate_time_range(start, end)?;
        let first = self.find_word_index(start, SearchMode::Start);
        let last = self.find_word_index(end, SearchMode::End);
        Ok(&self.words[first..=last])
    }

    /// Sentences overlapping `[start, end]`.
    pub fn sentences_in_range(&self, start: f64, end: f64) -> TranscriptResult<&[Sentence]> {
        self.validate_time_range(start, end)?;
        let first = self.find_sentence_index(start, SearchMode::Start);
        let last = self.find_sentence_index(end, SearchMode::End);
        Ok(&self.sentences[first..=last])
    }

    fn validate_time_range(&self, start: f64, end: f64) -> TranscriptResult<()> {
        let end_time = self.end_time();
        let valid = start.is_finite()
            && end.is_finite()
            && start >= 0.0
            && start < end
            && end <= end_time + TIME_TOLERANCE;
        if valid {
            Ok(())
        } else {
            Err(TranscriptError::InvalidTimeRange {
                start,
                end,
                end_time,
            })
        }
    }
}
