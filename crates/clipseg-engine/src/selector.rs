//! Clip selection: turns cuts into segments and applies the duration policy.

use std::collections::BTreeSet;

use clipseg_models::{Segment, Transcription};
use tracing::debug;

use crate::config::SegmenterConfig;
use crate::error::{SegmentationError, SegmentationResult};
use crate::mapper::Cut;
use crate::tokenize::{is_stop_word, normalize_token};

/// Weight of duration closeness in the clip score; lexical density takes
/// the rest.
const CLOSENESS_WEIGHT: f64 = 0.7;

/// Split the transcript at every cut.
///
/// The segments tile `[0, end_time]` without gaps or overlap. Scores are
/// left at zero.
pub fn build_segments(transcription: &Transcription, cuts: &[Cut]) -> Vec<Segment> {
    let sentences = transcription.sentences();
    if sentences.is_empty() {
        return Vec::new();
    }

    let mut bounds: Vec<(f64, usize)> = Vec::with_capacity(cuts.len() + 2);
    bounds.push((transcription.start_time(), 0));
    bounds.extend(cuts.iter().map(|c| (c.time, c.next_sentence)));
    bounds.push((transcription.end_time(), sentences.len()));

    bounds
        .windows(2)
        .filter(|pair| pair[0].1 < pair[1].1 && pair[0].0 < pair[1].0)
        .map(|pair| {
            let (start_time, start_sentence) = pair[0];
            let (end_time, end_sentence) = pair[1];
            Segment {
                start_time,
                end_time,
                start_sentence,
                end_sentence,
                start_char: sentences[start_sentence].start_char,
                end_char: sentences[end_sentence - 1].end_char,
                score: 0.0,
                needs_trim: false,
            }
        })
        .collect()
}

/// Score a segment in `[0, 1]` by closeness to the target duration and
/// lexical density.
pub fn score_segment(
    transcription: &Transcription,
    segment: &Segment,
    config: &SegmenterConfig,
) -> f64 {
    let target = config.effective_target();
    let closeness = 1.0 / (1.0 + (segment.duration() - target).abs() / target);
    let density = lexical_density(transcription, segment, config.stopword_filtering);

    (CLOSENESS_WEIGHT * closeness + (1.0 - CLOSENESS_WEIGHT) * density).clamp(0.0, 1.0)
}

/// Distinct content terms per word.
fn lexical_density(
    transcription: &Transcription,
    segment: &Segment,
    filter_stop_words: bool,
) -> f64 {
    let sentences = transcription.sentences();
    let (Some(first), Some(last)) = (
        sentences.get(segment.start_sentence),
        segment
            .end_sentence
            .checked_sub(1)
            .and_then(|i| sentences.get(i)),
    ) else {
        return 0.0;
    };

    let words = &transcription.words()[first.start_word..last.end_word];
    if words.is_empty() {
        return 0.0;
    }

    let terms: BTreeSet<String> = words
        .iter()
        .filter_map(|w| normalize_token(&w.text))
        .filter(|t| !(filter_stop_words && is_stop_word(t)))
        .collect();

    terms.len() as f64 / words.len() as f64
}

/// Apply the duration policy and scoring to raw segments.
///
/// Segments shorter than `min_duration` are dropped; segments longer than
/// `max_duration` are kept and flagged `needs_trim`. Survivors come back in
/// time order.
pub fn select_clips(
    transcription: &Transcription,
    segments: Vec<Segment>,
    config: &SegmenterConfig,
) -> SegmentationResult<Vec<Segment>> {
    let candidates = segments.len();

    let clips: Vec<Segment> = segments
        .into_iter()
        .filter(|s| s.duration() >= config.min_duration)
        .map(|mut s| {
            s.needs_trim = s.duration() > config.max_duration;
            s.score = score_segment(transcription, &s, config);
            s
        })
        .collect();

    debug!(
        candidates,
        kept = clips.len(),
        min_duration = config.min_duration,
        max_duration = config.max_duration,
        "Applied duration policy"
    );

    if clips.is_empty() {
        return Err(SegmentationError::NoSegmentsFound {
            candidates,
            min_duration: config.min_duration,
        });
    }

    Ok(clips)
}

/// Keep the `k` best clips, best first. Ties go to the earlier clip.
pub fn rank_clips(mut clips: Vec<Segment>, k: usize) -> Vec<Segment> {
    clips.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(a.start_time.total_cmp(&b.start_time))
    });
    clips.truncate(k);
    clips
}

/// Summary statistics for a clip list.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipStats {
    /// Number of clips.
    pub clip_count: usize,
    /// Total clip duration in seconds.
    pub total_clip_secs: f64,
    /// Fraction of the transcript covered by clips (0.0 to 1.0).
    pub coverage_ratio: f64,
    /// Number of clips longer than the maximum duration.
    pub needs_trim_count: usize,
}

pub fn compute_clip_stats(clips: &[Segment], total_duration: f64) -> ClipStats {
    let total_clip_secs: f64 = clips.iter().map(Segment::duration).sum();
    let needs_trim_count = clips.iter().filter(|c| c.needs_trim).count();

    let coverage_ratio = if total_duration > 0.0 {
        (total_clip_secs / total_duration).min(1.0)
    } else {
        0.0
    };

    ClipStats {
        clip_count: clips.len(),
        total_clip_secs,
        coverage_ratio,
        needs_trim_count,
    }
}
