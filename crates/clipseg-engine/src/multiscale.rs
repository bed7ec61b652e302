//! Multi-scale candidate search.
//!
//! Fine block sizes find short topical runs, coarse ones find whole
//! chapters. Running the pipeline at several scales and pooling the results
//! gives a candidate pool with clips of many lengths. Candidates may
//! overlap; near-duplicates across scales are dropped.

use clipseg_models::{Segment, Transcription};
use tracing::debug;

use crate::config::SegmenterConfig;
use crate::error::{ErrorKind, SegmentationError, SegmentationResult};
use crate::finder::ClipFinder;
use crate::selector::{build_segments, score_segment};

/// Block sizes tried by default, fine to coarse.
pub const DEFAULT_BLOCK_SIZES: [usize; 4] = [10, 20, 40, 80];

/// Candidates whose start and end differ by less than this in total
/// (seconds) are duplicates.
pub const DEFAULT_DUPLICATE_TOLERANCE: f64 = 15.0;

/// Pools clip candidates from tiling at several block sizes.
#[derive(Debug, Clone)]
pub struct MultiScaleFinder {
    config: SegmenterConfig,
    block_sizes: Vec<usize>,
    duplicate_tolerance: f64,
}

impl MultiScaleFinder {
    /// Create a finder; `config.block_size` is replaced by each scale.
    pub fn new(config: SegmenterConfig) -> SegmentationResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            block_sizes: DEFAULT_BLOCK_SIZES.to_vec(),
            duplicate_tolerance: DEFAULT_DUPLICATE_TOLERANCE,
        })
    }

    /// Replace the block sizes to try.
    pub fn with_block_sizes(mut self, block_sizes: Vec<usize>) -> SegmentationResult<Self> {
        if block_sizes.is_empty() || block_sizes.contains(&0) {
            return Err(SegmentationError::invalid_config(
                "block_sizes",
                "must be non-empty and every size at least 1",
            ));
        }
        self.block_sizes = block_sizes;
        Ok(self)
    }

    pub fn with_duplicate_tolerance(mut self, seconds: f64) -> SegmentationResult<Self> {
        if !(seconds.is_finite() && seconds >= 0.0) {
            return Err(SegmentationError::invalid_config(
                "duplicate_tolerance",
                format!("must be non-negative, got {}", seconds),
            ));
        }
        self.duplicate_tolerance = seconds;
        Ok(self)
    }

    pub fn block_sizes(&self) -> &[usize] {
        &self.block_sizes
    }

    /// Pool candidates from every scale, sorted by start time (shorter
    /// first on ties).
    pub fn find_candidates(
        &self,
        transcription: &Transcription,
    ) -> SegmentationResult<Vec<Segment>> {
        let config = &self.config;
        let mut accepted: Vec<Segment> = Vec::new();
        let mut seen = 0usize;

        // The whole transcript is a clip when it fits
        if transcription.duration() <= config.max_duration {
            for whole in build_segments(transcription, &[]) {
                seen += 1;
                self.accept(transcription, whole, &mut accepted);
            }
        }

        for &block_size in &self.block_sizes {
            let finder = ClipFinder::new(config.clone().with_block_size(block_size))?;
            let outcome = match finder.tile(transcription) {
                Ok(outcome) => outcome,
                Err(e) if e.kind() == ErrorKind::InsufficientData => {
                    debug!(block_size, error = %e, "Skipping scale");
                    continue;
                }
                Err(e) => return Err(e),
            };

            let segments = build_segments(transcription, &outcome.cuts);
            seen += segments.len();
            let before = accepted.len();
            for segment in segments {
                let duration = segment.duration();
                if duration < config.min_duration || duration > config.max_duration {
                    continue;
                }
                self.accept(transcription, segment, &mut accepted);
            }

            debug!(
                block_size,
                cuts = outcome.cuts.len(),
                added = accepted.len() - before,
                "Scale complete"
            );
        }

        if accepted.is_empty() {
            return Err(SegmentationError::NoSegmentsFound {
                candidates: seen,
                min_duration: config.min_duration,
            });
        }

        accepted.sort_by(|a, b| {
            a.start_time
                .total_cmp(&b.start_time)
                .then(a.duration().total_cmp(&b.duration()))
        });
        Ok(accepted)
    }

    fn accept(
        &self,
        transcription: &Transcription,
        mut segment: Segment,
        accepted: &mut Vec<Segment>,
    ) {
        if self.is_duplicate(&segment, accepted) {
            return;
        }
        segment.needs_trim = segment.duration() > self.config.max_duration;
        segment.score = score_segment(transcription, &segment, &self.config);
        accepted.push(segment);
    }

    fn is_duplicate(&self, segment: &Segment, accepted: &[Segment]) -> bool {
        accepted.iter().any(|existing| {
            (segment.start_time - existing.start_time).abs()
                + (segment.end_time - existing.end_time).abs()
                < self.duplicate_tolerance
        })
    }
}
