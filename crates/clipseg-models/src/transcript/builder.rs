//! Assembles the sentence/word/character hierarchy from timed words.
//!
//! Every construction path (explicit timed words, sentence spans, raw
//! character records) ends here, so the hierarchy invariants are checked
//! in one place:
//! - a parent's span is the union of its children's spans
//! - sibling spans are non-decreasing and never overlap
//! - char offsets index the normalized text (words joined by one space)

use super::elements::{Character, Sentence, Word};
use super::error::{TranscriptError, TranscriptResult};
use super::{TranscriptMetadata, Transcription};

/// Slack allowed when comparing neighbouring timestamps.
pub(super) const TIME_TOLERANCE: f64 = 1e-6;

/// A word whose characters already carry timestamps.
#[derive(Debug, Clone)]
pub(super) struct PendingWord {
    pub text: String,
    /// `(start, end, speaker)` for every char of `text`.
    pub char_times: Vec<(f64, f64, Option<u32>)>,
}

impl PendingWord {
    /// Spread `text` uniformly over `[start, end]`.
    pub fn spread(text: &str, start: f64, end: f64) -> Self {
        let count = text.chars().count().max(1);
        let step = (end - start) / count as f64;
        let char_times = (0..text.chars().count())
            .map(|i| {
                let char_start = start + step * i as f64;
                let char_end = if i + 1 == count {
                    end
                } else {
                    start + step * (i + 1) as f64
                };
                (char_start, char_end, None)
            })
            .collect();
        Self {
            text: text.to_string(),
            char_times,
        }
    }

    fn start_time(&self) -> f64 {
        self.char_times.first().map(|t| t.0).unwrap_or(0.0)
    }

    fn end_time(&self) -> f64 {
        self.char_times.last().map(|t| t.1).unwrap_or(0.0)
    }
}

/// Build a [`Transcription`] from sentences of timed words.
pub(super) fn assemble(
    metadata: TranscriptMetadata,
    sentences: Vec<Vec<PendingWord>>,
) -> TranscriptResult<Transcription> {
    if sentences.iter().all(|s| s.is_empty()) {
        return Err(TranscriptError::invalid("transcription has no words"));
    }

    let mut text = String::new();
    let mut char_len = 0usize;
    let mut characters: Vec<Character> = Vec::new();
    let mut words: Vec<Word> = Vec::new();
    let mut out_sentences: Vec<Sentence> = Vec::with_capacity(sentences.len());

    for (sentence_index, sentence_words) in sentences.into_iter().enumerate() {
        if sentence_words.is_empty() {
            return Err(TranscriptError::invalid(format!(
                "sentence {} has no words",
                sentence_index
            )));
        }

        let start_word = words.len();
        let mut sentence_start_char = None;

        for pending in sentence_words {
            validate_word(&pending, words.len())?;

            let word_start = pending.start_time();
            let word_end = pending.end_time();

            if let Some(prev) = words.last() {
                if word_start + TIME_TOLERANCE < prev.end_time {
                    return Err(TranscriptError::invalid(format!(
                        "word {} ('{}') starts at {:.3}s before previous word ends at {:.3}s",
                        words.len(),
                        pending.text,
                        word_start,
                        prev.end_time
                    )));
                }

                // Separator spans the pause between the two words
                text.push(' ');
                characters.push(Character {
                    text: ' ',
                    start_time: prev.end_time,
                    end_time: word_start.max(prev.end_time),
                    word_index: None,
                    sentence_index: None,
                    speaker: None,
                });
                char_len += 1;
            }

            let word_index = words.len();
            let start_char = char_len;
            sentence_start_char.get_or_insert(start_char);

            for (ch, (start, end, speaker)) in pending.text.chars().zip(pending.char_times) {
                text.push(ch);
                characters.push(Character {
                    text: ch,
                    start_time: start,
                    end_time: end,
                    word_index: Some(word_index),
                    sentence_index: Some(sentence_index),
                    speaker,
                });
                char_len += 1;
            }

            words.push(Word {
                text: pending.text,
                start_time: word_start,
                end_time: word_end,
                start_char,
                end_char: char_len,
                sentence_index,
            });
        }

        let owned = &words[start_word..];
        let sentence_text = owned
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        out_sentences.push(Sentence {
            text: sentence_text,
            start_time: owned[0].start_time,
            end_time: owned[owned.len() - 1].end_time,
            start_char: sentence_start_char.unwrap_or(char_len),
            end_char: char_len,
            start_word,
            end_word: words.len(),
        });
    }

    Ok(Transcription {
        metadata,
        text,
        characters,
        words,
        sentences: out_sentences,
    })
}

fn validate_word(word: &PendingWord, index: usize) -> TranscriptResult<()> {
    if word.text.is_empty() || word.text.chars().any(char::is_whitespace) {
        return Err(TranscriptError::invalid(format!(
            "word {} must be non-empty and contain no whitespace, got '{}'",
            index, word.text
        )));
    }

    if word.char_times.len() != word.text.chars().count() {
        return Err(TranscriptError::invalid(format!(
            "word {} has {} chars but {} timestamps",
            index,
            word.text.chars().count(),
            word.char_times.len()
        )));
    }

    let mut prev_end: Option<f64> = None;
    for &(start, end, _) in &word.char_times {
        if !start.is_finite() || !end.is_finite() || start < 0.0 {
            return Err(TranscriptError::invalid(format!(
                "word {} ('{}') has an invalid timestamp",
                index, word.text
            )));
        }
        if end + TIME_TOLERANCE < start {
            return Err(TranscriptError::invalid(format!(
                "word {} ('{}') ends at {:.3}s before it starts at {:.3}s",
                index, word.text, end, start
            )));
        }
        if let Some(prev) = prev_end {
            if start + TIME_TOLERANCE < prev {
                return Err(TranscriptError::invalid(format!(
                    "characters of word {} ('{}') overlap",
                    index, word.text
                )));
            }
        }
        prev_end = Some(end);
    }

    Ok(())
}
