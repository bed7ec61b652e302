//! Segmentation metrics collection.
//!
//! Provides standardized metrics for monitoring clip detection:
//! - Run counters by operation and outcome
//! - Latency histograms
//! - Boundary and clip counts per run

use metrics::{counter, histogram};

// =============================================================================
// Metric Names
// =============================================================================

/// Metric name constants for consistency.
pub mod names {
    /// Total segmentation runs by operation and outcome.
    pub const RUNS_TOTAL: &str = "clipseg_runs_total";

    /// Run latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "clipseg_latency_seconds";

    /// Boundaries detected per run.
    pub const BOUNDARIES: &str = "clipseg_boundaries";

    /// Clips returned per run by operation.
    pub const CLIPS: &str = "clipseg_clips";
}

// =============================================================================
// Recording Functions
// =============================================================================

/// Record metrics for a completed run. `outcome` is `ok` or an error kind.
pub fn record_run(operation: &'static str, outcome: &'static str, latency_secs: f64) {
    counter!(
        names::RUNS_TOTAL,
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation
    )
    .record(latency_secs);
}

/// Record the number of boundaries found by one tiling pass.
pub fn record_boundaries(count: usize) {
    histogram!(names::BOUNDARIES).record(count as f64);
}

/// Record the number of clips returned.
pub fn record_clips(operation: &'static str, count: usize) {
    histogram!(
        names::CLIPS,
        "operation" => operation
    )
    .record(count as f64);
}

// =============================================================================
// Tests
// =============================================================================
