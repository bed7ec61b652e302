//! Pseudosentence blocks: fixed-size runs of consecutive words.

use std::ops::Range;

use clipseg_models::Word;

use crate::error::{SegmentationError, SegmentationResult};
use crate::tokenize::TermVector;

/// Fewest blocks that give a gap with a neighbour on each side.
pub const MIN_BLOCKS: usize = 3;

/// A run of `block_size` consecutive words, crossing sentence boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Position in the block sequence.
    pub index: usize,
    /// First word index.
    pub start_word: usize,
    /// One past the last word index.
    pub end_word: usize,
    /// Start of the first word (seconds).
    pub start_time: f64,
    /// End of the last word (seconds).
    pub end_time: f64,
    /// Term counts of the block's words, stop words removed when filtering.
    pub terms: TermVector,
}

impl Block {
    pub fn word_range(&self) -> Range<usize> {
        self.start_word..self.end_word
    }

    /// Index of the last word in the block.
    pub fn last_word(&self) -> usize {
        self.end_word.saturating_sub(1)
    }

    pub fn len(&self) -> usize {
        self.end_word - self.start_word
    }

    pub fn is_empty(&self) -> bool {
        self.start_word == self.end_word
    }
}

/// Partition words into consecutive blocks of `block_size`.
///
/// The final block holds the remainder and may be shorter.
pub fn build_blocks(
    words: &[Word],
    block_size: usize,
    filter_stop_words: bool,
) -> SegmentationResult<Vec<Block>> {
    if block_size == 0 {
        return Err(SegmentationError::invalid_config(
            "block_size",
            "must be at least 1",
        ));
    }

    if words.len() < block_size {
        return Err(SegmentationError::TranscriptTooShort {
            words: words.len(),
            block_size,
        });
    }

    let blocks = words
        .chunks(block_size)
        .enumerate()
        .map(|(index, chunk)| {
            let start_word = index * block_size;
            Block {
                index,
                start_word,
                end_word: start_word + chunk.len(),
                start_time: chunk[0].start_time,
                end_time: chunk[chunk.len() - 1].end_time,
                terms: TermVector::from_words(chunk.iter().map(|w| w.text.as_str()), filter_stop_words),
            }
        })
        .collect();

    Ok(blocks)
}

/// Number of leading gaps whose blocks carry enough words to compare.
///
/// A final block shorter than half of `block_size` is kept as part of the
/// transcript, but the gap in front of it is left out of detection while at
/// least two other gaps remain.
pub fn comparable_gaps(blocks: &[Block], block_size: usize) -> usize {
    let gaps = blocks.len().saturating_sub(1);
    let short_tail = blocks
        .last()
        .is_some_and(|block| block.len() * 2 < block_size);

    if short_tail && gaps > 2 {
        gaps - 1
    } else {
        gaps
    }
}

/// Fail unless there are enough blocks to score depth.
pub fn ensure_tileable(blocks: &[Block]) -> SegmentationResult<()> {
    if blocks.len() < MIN_BLOCKS {
        return Err(SegmentationError::InsufficientData {
            blocks: blocks.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(texts: &[&str]) -> Vec<Word> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| Word {
                text: text.to_string(),
                start_time: i as f64,
                end_time: i as f64 + 0.5,
                start_char: 0,
                end_char: 0,
                sentence_index: 0,
            })
            .collect()
    }

    #[test]
    fn test_blocks_partition_words() {
        let words = words(&["a1", "b2", "c3", "d4", "e5", "f6", "g7"]);
        let blocks = build_blocks(&words, 3, false).unwrap();

        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].word_range(), 0..3);
        assert_eq!(blocks[1].word_range(), 3..6);
        assert_eq!(blocks[2].word_range(), 6..7);
        assert_eq!(blocks[2].len(), 1);
        assert_eq!(blocks[1].last_word(), 5);
        assert_eq!((blocks[1].start_time, blocks[1].end_time), (3.0, 5.5));
        assert_eq!(blocks[0].terms.count("b2"), 1);
    }

    #[test]
    fn test_exact_multiple_has_no_remainder() {
        let words = words(&["a", "b", "c", "d"]);
        let blocks = build_blocks(&words, 2, false).unwrap();
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|b| b.len() == 2));
    }

    #[test]
    fn test_too_short() {
        let words = words(&["a", "b"]);
        assert_eq!(
            build_blocks(&words, 3, false),
            Err(SegmentationError::TranscriptTooShort {
                words: 2,
                block_size: 3
            })
        );
    }

    #[test]
    fn test_ensure_tileable() {
        let words = words(&["a", "b", "c", "d"]);
        let two = build_blocks(&words, 2, false).unwrap();
        assert_eq!(
            ensure_tileable(&two),
            Err(SegmentationError::InsufficientData { blocks: 2 })
        );

        let four = build_blocks(&words, 1, false).unwrap();
        assert!(ensure_tileable(&four).is_ok());
    }

    #[test]
    fn test_comparable_gaps_skip_short_tail() {
        let letters = ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k"];

        // 3 + 3 + 3 + 1
        let blocks = build_blocks(&words(&letters[..10]), 3, false).unwrap();
        assert_eq!(comparable_gaps(&blocks, 3), 2);

        // 3 + 3 + 3 + 2: a tail of at least half a block is compared
        let blocks = build_blocks(&words(&letters), 3, false).unwrap();
        assert_eq!(comparable_gaps(&blocks, 3), 3);

        // 5 + 5 + 1: only two gaps, both kept
        let blocks = build_blocks(&words(&letters), 5, false).unwrap();
        assert_eq!(comparable_gaps(&blocks, 5), 2);
    }
}
