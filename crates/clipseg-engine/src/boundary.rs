//! Boundary detection: smoothing, depth scoring, and adaptive cutoff.
//!
//! A topic shift shows up as a valley in the gap-score sequence. Each gap's
//! depth measures how far the scores rise on both sides before they start
//! falling again; deep valleys above the cutoff become boundaries.
//!
//! Scores are compared within `SCORE_EPSILON`, so smoothing round-off never
//! creates a peak or a valley.

use serde::Serialize;

use crate::config::{CutoffPolicy, SegmenterConfig, SmoothingMethod};

/// Score differences below this are rounding noise.
const SCORE_EPSILON: f64 = 1e-9;

/// Scores for one gap between adjacent blocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryCandidate {
    /// Gap index: between blocks `gap` and `gap + 1`.
    pub gap: usize,
    pub gap_score: f64,
    pub smoothed_score: f64,
    pub depth_score: f64,
    pub is_boundary: bool,
}

/// Result of running detection over a gap-score sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub candidates: Vec<BoundaryCandidate>,
    /// Boundary gap indices, ascending.
    pub boundaries: Vec<usize>,
    pub cutoff: f64,
}

/// Smooth scores with a window of `width` centred on each gap.
///
/// Near the edges the window shrinks symmetrically instead of padding, so
/// the first and last scores stay as they are. `width <= 1`, or a window as
/// wide as the whole sequence, returns the scores unchanged.
pub fn smooth(scores: &[f64], width: usize, method: SmoothingMethod) -> Vec<f64> {
    let n = scores.len();
    if width <= 1 || width >= n {
        return scores.to_vec();
    }

    let before = (width - 1) / 2;
    let after = width / 2;

    (0..n)
        .map(|i| {
            let reach = i.min(n - 1 - i);
            let window = &scores[i - before.min(reach)..=i + after.min(reach)];
            match method {
                SmoothingMethod::MovingAverage => {
                    window.iter().sum::<f64>() / window.len() as f64
                }
                SmoothingMethod::Median => median(window),
            }
        })
        .collect()
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Depth of each gap below its nearest peaks on either side.
///
/// From each gap, climb left while scores do not decrease and take the
/// score reached as the left peak; same to the right. Depth is the sum of
/// the two rises, so it is never negative.
pub fn depth_scores(smoothed: &[f64]) -> Vec<f64> {
    let n = smoothed.len();
    (0..n)
        .map(|i| {
            let mut left = i;
            while left > 0 && smoothed[left - 1] >= smoothed[left] - SCORE_EPSILON {
                left -= 1;
            }
            let mut right = i;
            while right + 1 < n && smoothed[right + 1] >= smoothed[right] - SCORE_EPSILON {
                right += 1;
            }
            let depth = (smoothed[left] - smoothed[i]) + (smoothed[right] - smoothed[i]);
            if depth < SCORE_EPSILON {
                0.0
            } else {
                depth
            }
        })
        .collect()
}

/// Depth cutoff derived from the depth distribution.
pub fn cutoff(depths: &[f64], policy: CutoffPolicy, threshold_constant: f64) -> f64 {
    if depths.is_empty() {
        return 0.0;
    }

    let n = depths.len() as f64;
    let mean = depths.iter().sum::<f64>() / n;
    let variance = depths.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n;
    let stdev = variance.sqrt();

    match policy {
        CutoffPolicy::Classic => mean - stdev / threshold_constant,
        CutoffPolicy::Average => mean,
        CutoffPolicy::High => mean + stdev,
        CutoffPolicy::Low => mean - stdev,
    }
}

/// Gaps whose depth is positive, reaches `cutoff`, and is a local maximum.
///
/// A run of equal depths counts as one peak. It yields the gap with the
/// lowest raw score in the run, taking the middle one when several tie.
pub fn select_boundaries(depths: &[f64], gap_scores: &[f64], cutoff: f64) -> Vec<usize> {
    let n = depths.len();
    let mut boundaries = Vec::new();
    let mut i = 0;

    while i < n {
        let mut j = i;
        while j + 1 < n && (depths[j + 1] - depths[i]).abs() <= SCORE_EPSILON {
            j += 1;
        }

        let depth = depths[i];
        let left = if i > 0 { depths[i - 1] } else { f64::NEG_INFINITY };
        let right = if j + 1 < n { depths[j + 1] } else { f64::NEG_INFINITY };

        if depth > 0.0
            && depth >= cutoff - SCORE_EPSILON
            && depth > left + SCORE_EPSILON
            && depth > right + SCORE_EPSILON
        {
            boundaries.push(lowest_gap(gap_scores, i, j));
        }
        i = j + 1;
    }

    boundaries
}

/// Middle of the gaps in `first..=last` sharing the lowest raw score.
fn lowest_gap(gap_scores: &[f64], first: usize, last: usize) -> usize {
    let run = first..=last.min(gap_scores.len().saturating_sub(1));
    let lowest = run
        .clone()
        .map(|g| gap_scores[g])
        .fold(f64::INFINITY, f64::min);
    let valley: Vec<usize> = run
        .filter(|&g| gap_scores[g] <= lowest + SCORE_EPSILON)
        .collect();

    valley
        .get(valley.len().saturating_sub(1) / 2)
        .copied()
        .unwrap_or((first + last) / 2)
}

/// Run smoothing, depth scoring, and boundary selection over gap scores.
///
/// Only the first `comparable` gaps take part; later gaps are reported as
/// candidates with zero depth and never become boundaries.
pub fn detect(gap_scores: &[f64], comparable: usize, config: &SegmenterConfig) -> Detection {
    let comparable = comparable.min(gap_scores.len());
    let scored = &gap_scores[..comparable];

    let mut smoothed = smooth(scored, config.smoothing_window, config.smoothing_method);
    let mut depths = depth_scores(&smoothed);
    let cutoff = cutoff(&depths, config.cutoff_policy, config.threshold_constant);
    let boundaries = select_boundaries(&depths, scored, cutoff);

    smoothed.extend_from_slice(&gap_scores[comparable..]);
    depths.resize(gap_scores.len(), 0.0);

    let candidates = gap_scores
        .iter()
        .zip(&smoothed)
        .zip(&depths)
        .enumerate()
        .map(|(gap, ((&gap_score, &smoothed_score), &depth_score))| BoundaryCandidate {
            gap,
            gap_score,
            smoothed_score,
            depth_score,
            is_boundary: boundaries.binary_search(&gap).is_ok(),
        })
        .collect();

    Detection {
        candidates,
        boundaries,
        cutoff,
    }
}
