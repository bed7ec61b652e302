//! Clip finder: runs the full tiling and selection pipeline.

use std::time::Instant;

use clipseg_models::{Segment, Transcription};
use tracing::{debug, info, info_span};

use crate::blocker::{build_blocks, comparable_gaps, ensure_tileable, Block};
use crate::boundary::{detect, BoundaryCandidate};
use crate::cohesion::score_gaps;
use crate::config::SegmenterConfig;
use crate::error::{SegmentationError, SegmentationResult};
use crate::mapper::{map_boundaries, Cut};
use crate::metrics;
use crate::selector::{build_segments, compute_clip_stats, rank_clips, select_clips};

/// Everything one tiling pass produced, for inspection and debugging.
#[derive(Debug, Clone, PartialEq)]
pub struct TilingOutcome {
    pub blocks: Vec<Block>,
    /// One candidate per gap between adjacent blocks.
    pub candidates: Vec<BoundaryCandidate>,
    /// Boundary gap indices, ascending.
    pub boundaries: Vec<usize>,
    /// Depth cutoff the boundaries were selected against.
    pub cutoff: f64,
    /// Sentence-aligned cut times, strictly increasing.
    pub cuts: Vec<Cut>,
}

/// Finds topically coherent clips in a transcript.
///
/// The configuration is validated once at construction; a finder can be
/// shared and reused across transcripts.
#[derive(Debug, Clone)]
pub struct ClipFinder {
    config: SegmenterConfig,
}

impl ClipFinder {
    /// Create a finder, rejecting invalid configuration up front.
    pub fn new(config: SegmenterConfig) -> SegmentationResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Run tiling only and return every intermediate result.
    pub fn detect_boundaries(
        &self,
        transcription: &Transcription,
    ) -> SegmentationResult<TilingOutcome> {
        let span = info_span!(
            "detect_boundaries",
            words = transcription.words().len(),
            block_size = self.config.block_size
        );
        let _guard = span.enter();

        observe("detect_boundaries", || self.tile(transcription))
    }

    /// Find clips, in time order.
    pub fn find_clips(&self, transcription: &Transcription) -> SegmentationResult<Vec<Segment>> {
        let span = info_span!(
            "find_clips",
            words = transcription.words().len(),
            block_size = self.config.block_size
        );
        let _guard = span.enter();

        let clips = observe("find_clips", || self.select(transcription))?;
        metrics::record_clips("find_clips", clips.len());
        Ok(clips)
    }

    /// Find the `k` best clips, best first.
    pub fn find_top_clips(
        &self,
        transcription: &Transcription,
        k: usize,
    ) -> SegmentationResult<Vec<Segment>> {
        if k == 0 {
            return Err(SegmentationError::invalid_config(
                "top_k",
                "must be at least 1",
            ));
        }

        let span = info_span!(
            "find_top_clips",
            words = transcription.words().len(),
            block_size = self.config.block_size,
            k
        );
        let _guard = span.enter();

        let clips = observe("find_top_clips", || {
            self.select(transcription).map(|clips| rank_clips(clips, k))
        })?;
        metrics::record_clips("find_top_clips", clips.len());
        Ok(clips)
    }

    pub(crate) fn tile(
        &self,
        transcription: &Transcription,
    ) -> SegmentationResult<TilingOutcome> {
        let config = &self.config;

        let blocks = build_blocks(
            transcription.words(),
            config.block_size,
            config.stopword_filtering,
        )?;
        ensure_tileable(&blocks)?;

        let gap_scores = score_gaps(
            &blocks,
            config.comparison_window,
            config.similarity_metric,
            config.parallel_scoring,
        );
        let comparable = comparable_gaps(&blocks, config.block_size);
        let detection = detect(&gap_scores, comparable, config);
        let cuts = map_boundaries(transcription, &blocks, &detection.boundaries);

        debug!(
            blocks = blocks.len(),
            boundaries = detection.boundaries.len(),
            cuts = cuts.len(),
            cutoff = detection.cutoff,
            "Tiled transcript"
        );
        metrics::record_boundaries(detection.boundaries.len());

        Ok(TilingOutcome {
            blocks,
            candidates: detection.candidates,
            boundaries: detection.boundaries,
            cutoff: detection.cutoff,
            cuts,
        })
    }

    fn select(&self, transcription: &Transcription) -> SegmentationResult<Vec<Segment>> {
        let outcome = self.tile(transcription)?;
        let segments = build_segments(transcription, &outcome.cuts);
        let clips = select_clips(transcription, segments, &self.config)?;

        let stats = compute_clip_stats(&clips, transcription.duration());
        info!(
            clips = stats.clip_count,
            clip_secs = stats.total_clip_secs,
            coverage = stats.coverage_ratio,
            needs_trim = stats.needs_trim_count,
            "Found clips"
        );

        Ok(clips)
    }
}

/// Time `run` and record its outcome.
fn observe<T>(
    operation: &'static str,
    run: impl FnOnce() -> SegmentationResult<T>,
) -> SegmentationResult<T> {
    let start = Instant::now();
    let result = run();
    let latency_secs = start.elapsed().as_secs_f64();

    let outcome = match &result {
        Ok(_) => "ok",
        Err(e) => {
            debug!(error = %e, kind = %e.kind(), "Segmentation failed");
            e.kind().as_str()
        }
    };
    metrics::record_run(operation, outcome, latency_secs);

    result
}
