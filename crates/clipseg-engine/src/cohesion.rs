//! Lexical cohesion across block gaps.

use rayon::prelude::*;

use crate::blocker::Block;
use crate::config::SimilarityMetric;
use crate::tokenize::TermVector;

/// Score every gap between adjacent blocks.
///
/// Gap `i` sits between blocks `i` and `i + 1`. With `window > 1` the
/// `window` blocks ending at `i` are pooled against the `window` blocks
/// starting at `i + 1`, truncated at the sequence ends. Output length is
/// `blocks.len() - 1`, or empty for fewer than two blocks.
pub fn score_gaps(
    blocks: &[Block],
    window: usize,
    metric: SimilarityMetric,
    parallel: bool,
) -> Vec<f64> {
    let gaps = blocks.len().saturating_sub(1);
    let window = window.max(1);

    if parallel {
        (0..gaps)
            .into_par_iter()
            .map(|gap| score_gap(blocks, gap, window, metric))
            .collect()
    } else {
        (0..gaps)
            .map(|gap| score_gap(blocks, gap, window, metric))
            .collect()
    }
}

fn score_gap(blocks: &[Block], gap: usize, window: usize, metric: SimilarityMetric) -> f64 {
    if window == 1 {
        return similarity(&blocks[gap].terms, &blocks[gap + 1].terms, metric);
    }

    let left_start = (gap + 1).saturating_sub(window);
    let right_end = (gap + 1 + window).min(blocks.len());

    let left = TermVector::sum(blocks[left_start..=gap].iter().map(|b| &b.terms));
    let right = TermVector::sum(blocks[gap + 1..right_end].iter().map(|b| &b.terms));
    similarity(&left, &right, metric)
}

/// Similarity of two term vectors under `metric`.
pub fn similarity(left: &TermVector, right: &TermVector, metric: SimilarityMetric) -> f64 {
    match metric {
        SimilarityMetric::Cosine => left.cosine(right),
        SimilarityMetric::Jaccard => left.jaccard(right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(index: usize, text: &str) -> Block {
        Block {
            index,
            start_word: index * 4,
            end_word: index * 4 + 4,
            start_time: index as f64,
            end_time: index as f64 + 1.0,
            terms: TermVector::from_words(text.split_whitespace(), true),
        }
    }

    fn blocks() -> Vec<Block> {
        vec![
            block(0, "rust borrow compiler ownership"),
            block(1, "rust borrow compiler ownership"),
            block(2, "pasta garlic tomato basil"),
            block(3, "pasta garlic tomato rust"),
        ]
    }

    #[test]
    fn test_adjacent_scores() {
        let scores = score_gaps(&blocks(), 1, SimilarityMetric::Cosine, false);
        assert_eq!(scores.len(), 3);
        assert_eq!(scores[0], 1.0);
        assert_eq!(scores[1], 0.0);
        assert!((scores[2] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_windowed_scores_pool_neighbours() {
        let scores = score_gaps(&blocks(), 2, SimilarityMetric::Cosine, false);
        assert_eq!(scores.len(), 3);
        // Gap 1 pools blocks 0-1 against 2-3; only "rust" is shared
        assert!(scores[1] > 0.0 && scores[1] < 0.5);
        // Gap 0 has only one block on its left
        assert!(scores[0] > scores[1]);
    }

    #[test]
    fn test_jaccard_metric() {
        let scores = score_gaps(&blocks(), 1, SimilarityMetric::Jaccard, false);
        assert_eq!(scores[0], 1.0);
        assert!((scores[2] - 3.0 / 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let blocks = blocks();
        for window in 1..=3 {
            let sequential = score_gaps(&blocks, window, SimilarityMetric::Cosine, false);
            let parallel = score_gaps(&blocks, window, SimilarityMetric::Cosine, true);
            assert_eq!(sequential, parallel);
        }
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(score_gaps(&[], 1, SimilarityMetric::Cosine, false).is_empty());
        assert!(score_gaps(&blocks()[..1], 1, SimilarityMetric::Cosine, false).is_empty());
    }
}
