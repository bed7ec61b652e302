//! Character-level transcription records (WhisperX-style `char_info`).
//!
//! ```json
//! {
//!   "source_software": "whisperx-v3",
//!   "time_created": "2024-05-01 12:30:00.000000",
//!   "language": "en",
//!   "num_speakers": 2,
//!   "char_info": [
//!     { "char": "H", "start_time": 0.0, "end_time": 0.1, "speaker": 0 },
//!     { "char": " ", "start_time": null, "end_time": null, "speaker": null }
//!   ]
//! }
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::builder::PendingWord;
use super::error::{TranscriptError, TranscriptResult};

/// Format used for `time_created` in stored transcriptions.
pub const TIME_CREATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// A stored transcription as produced by the speech-to-text collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTranscription {
    pub source_software: String,
    pub time_created: String,
    pub language: String,
    #[serde(default)]
    pub num_speakers: Option<u32>,
    pub char_info: Vec<RawCharacter>,
}

/// One character entry; timestamps may be missing for unaligned characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCharacter {
    #[serde(rename = "char")]
    pub text: String,
    #[serde(default)]
    pub start_time: Option<f64>,
    #[serde(default)]
    pub end_time: Option<f64>,
    #[serde(default)]
    pub speaker: Option<u32>,
}

/// Parse `time_created`, accepting the stored format or RFC 3339.
pub(super) fn parse_time_created(value: &str) -> TranscriptResult<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| TranscriptError::invalid(format!("invalid time_created '{}'", value)))
}

/// Format `time_created` for storage.
pub(super) fn format_time_created(value: &DateTime<Utc>) -> String {
    value.format(TIME_CREATED_FORMAT).to_string()
}

/// A character with resolved timing.
#[derive(Debug, Clone, Copy)]
struct TimedChar {
    ch: char,
    start: f64,
    end: f64,
    speaker: Option<u32>,
}

/// Group raw characters into sentences of timed words.
pub(super) fn group_characters(chars: &[RawCharacter]) -> TranscriptResult<Vec<Vec<PendingWord>>> {
    let timed = resolve_timings(chars)?;
    let words = group_words(&timed);
    Ok(group_sentences(words))
}

/// Fill missing timestamps from the nearest timed neighbour and force the
/// character sequence to be non-decreasing and non-overlapping.
fn resolve_timings(chars: &[RawCharacter]) -> TranscriptResult<Vec<TimedChar>> {
    let mut partial: Vec<(char, Option<f64>, Option<f64>, Option<u32>)> =
        Vec::with_capacity(chars.len());

    for (index, raw) in chars.iter().enumerate() {
        let mut it = raw.text.chars();
        let ch = match (it.next(), it.next()) {
            (Some(ch), None) => ch,
            _ => {
                return Err(TranscriptError::invalid(format!(
                    "char_info[{}] must hold exactly one character, got '{}'",
                    index, raw.text
                )))
            }
        };

        let valid = |t: Option<f64>| t.filter(|v| v.is_finite() && *v >= 0.0);
        let start = valid(raw.start_time);
        let end = valid(raw.end_time);
        partial.push((ch, start.or(end), end.or(start), raw.speaker));
    }

    if partial.iter().all(|(_, start, _, _)| start.is_none()) {
        return Err(TranscriptError::invalid(
            "transcription has no timed characters",
        ));
    }

    // Backward fill for leading untimed characters
    let mut next_start: Option<f64> = None;
    let mut backfill = vec![None; partial.len()];
    for (i, (_, start, _, _)) in partial.iter().enumerate().rev() {
        if start.is_some() {
            next_start = *start;
        }
        backfill[i] = next_start;
    }

    let mut resolved = Vec::with_capacity(partial.len());
    let mut prev_end: Option<f64> = None;
    for (i, (ch, start, end, speaker)) in partial.into_iter().enumerate() {
        let (start, end) = match (start, end, prev_end) {
            (Some(s), Some(e), _) => (s, e),
            (_, _, Some(p)) => (p, p),
            _ => {
                let t = backfill[i].unwrap_or(0.0);
                (t, t)
            }
        };

        let start = prev_end.map_or(start, |p| start.max(p));
        let end = end.max(start);
        prev_end = Some(end);
        resolved.push(TimedChar {
            ch,
            start,
            end,
            speaker,
        });
    }

    Ok(resolved)
}

fn group_words(chars: &[TimedChar]) -> Vec<PendingWord> {
    let mut words = Vec::new();
    let mut current: Option<PendingWord> = None;

    for c in chars {
        if c.ch.is_whitespace() {
            if let Some(word) = current.take() {
                words.push(word);
            }
            continue;
        }
        let word = current.get_or_insert_with(|| PendingWord {
            text: String::new(),
            char_times: Vec::new(),
        });
        word.text.push(c.ch);
        word.char_times.push((c.start, c.end, c.speaker));
    }

    if let Some(word) = current {
        words.push(word);
    }
    words
}

/// Whether a word closes a sentence (`.`, `!`, `?`, ignoring trailing quotes
/// and brackets).
pub(super) fn ends_sentence(word: &str) -> bool {
    word.trim_end_matches(['"', '\'', ')', ']', '\u{201d}', '\u{2019}'])
        .ends_with(['.', '!', '?', '\u{2026}'])
}

fn group_sentences(words: Vec<PendingWord>) -> Vec<Vec<PendingWord>> {
    let mut sentences = Vec::new();
    let mut current = Vec::new();

    for word in words {
        let closes = ends_sentence(&word.text);
        current.push(word);
        if closes {
            sentences.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        sentences.push(current);
    }
    sentences
}
