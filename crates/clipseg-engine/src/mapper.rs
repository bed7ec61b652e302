//! Maps boundary gaps onto sentence-aligned cut times.

use clipseg_models::Transcription;
use serde::Serialize;
use tracing::trace;

use crate::blocker::Block;

/// A cut between two clips.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Cut {
    /// Cut time in seconds: the end of the last sentence before the cut.
    pub time: f64,
    /// Index of the first sentence after the cut.
    pub next_sentence: usize,
}

/// Convert boundary gaps into strictly increasing cut times.
///
/// Gap `i` sits after the last word of block `i`. When that word closes a
/// sentence the cut goes there; otherwise it moves to the nearer end of the
/// sentence the gap falls in, counted in words, preferring the earlier end
/// on a tie. A cut therefore never falls inside a sentence. Cuts at the very
/// start or end of the transcript are dropped, and gaps that land on the
/// same sentence collapse into one cut.
pub fn map_boundaries(
    transcription: &Transcription,
    blocks: &[Block],
    boundaries: &[usize],
) -> Vec<Cut> {
    let words = transcription.words();
    let sentences = transcription.sentences();
    let total = transcription.end_time();

    let mut cuts: Vec<Cut> = Vec::with_capacity(boundaries.len());

    for &gap in boundaries {
        let Some(block) = blocks.get(gap) else {
            continue;
        };
        let Some(word) = words.get(block.last_word()) else {
            continue;
        };
        let Some(containing) = sentences.get(word.sentence_index) else {
            continue;
        };

        // Sentence whose end becomes the cut; `None` is the transcript start
        let position = block.end_word;
        let sentence = if containing.end_word == position
            || containing.end_word.saturating_sub(position)
                < position.saturating_sub(containing.start_word)
        {
            Some(word.sentence_index)
        } else {
            word.sentence_index.checked_sub(1)
        };

        let Some(sentence) = sentence else {
            trace!(gap, "Dropping cut at transcript start");
            continue;
        };
        let time = sentences[sentence].end_time;
        if time <= 0.0 || time >= total {
            trace!(gap, time, "Dropping cut at transcript edge");
            continue;
        }
        if cuts.last().is_some_and(|prev| time <= prev.time) {
            continue;
        }

        cuts.push(Cut {
            time,
            next_sentence: sentence + 1,
        });
    }

    cuts
}
