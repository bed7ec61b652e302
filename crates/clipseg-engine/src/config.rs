//! Configuration for clip segmentation.
//!
//! These parameters control how finely the transcript is tiled and which
//! clips survive selection. The defaults follow classic TextTiling with
//! duration bounds suited to social-media clips.

use clipseg_models::parse_timestamp;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{SegmentationError, SegmentationResult};

/// Filter applied to the gap-score sequence before depth scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingMethod {
    MovingAverage,
    Median,
}

impl SmoothingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SmoothingMethod::MovingAverage => "moving_average",
            SmoothingMethod::Median => "median",
        }
    }

    /// Parse from a name such as `median` or `moving-average`.
    pub fn from_name(name: &str) -> Option<Self> {
        match normalize_name(name).as_str() {
            "moving_average" | "average" | "mean" => Some(Self::MovingAverage),
            "median" => Some(Self::Median),
            _ => None,
        }
    }
}

/// Similarity between the term vectors on either side of a gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMetric {
    /// Cosine of the term-frequency vectors.
    Cosine,
    /// Shared vocabulary over combined vocabulary.
    Jaccard,
}

impl SimilarityMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityMetric::Cosine => "cosine",
            SimilarityMetric::Jaccard => "jaccard",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match normalize_name(name).as_str() {
            "cosine" => Some(Self::Cosine),
            "jaccard" => Some(Self::Jaccard),
            _ => None,
        }
    }
}

/// How the depth-score cutoff is derived from the depth distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutoffPolicy {
    /// `mean - stdev / threshold_constant`
    Classic,
    /// `mean`
    Average,
    /// `mean + stdev`, fewer boundaries
    High,
    /// `mean - stdev`, more boundaries
    Low,
}

impl CutoffPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CutoffPolicy::Classic => "classic",
            CutoffPolicy::Average => "average",
            CutoffPolicy::High => "high",
            CutoffPolicy::Low => "low",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match normalize_name(name).as_str() {
            "classic" => Some(Self::Classic),
            "average" | "avg" => Some(Self::Average),
            "high" | "hc" => Some(Self::High),
            "low" | "lc" => Some(Self::Low),
            _ => None,
        }
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}

/// Configuration for boundary detection and clip selection.
///
/// Deserializes from partial JSON; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Words per pseudosentence block.
    ///
    /// - Lower values (6-10): fine-grained, many short topics
    /// - Default (20): classic TextTiling
    /// - Higher values (40+): only broad topic shifts
    pub block_size: usize,

    /// Blocks pooled on each side of a gap when scoring it (`1` = adjacent
    /// blocks only).
    pub comparison_window: usize,

    /// Width of the smoothing filter over gap scores (`1` = no smoothing).
    pub smoothing_window: usize,

    pub smoothing_method: SmoothingMethod,

    pub similarity_metric: SimilarityMetric,

    pub cutoff_policy: CutoffPolicy,

    /// Divisor of the standard deviation in the classic cutoff.
    pub threshold_constant: f64,

    /// Clips shorter than this are dropped (seconds).
    pub min_duration: f64,

    /// Clips longer than this are kept but flagged for trimming (seconds).
    pub max_duration: f64,

    /// Preferred clip length used for ranking (seconds).
    ///
    /// Clamped into `[min_duration, max_duration]` when scoring.
    pub target_duration: f64,

    /// Drop common function words before building term vectors.
    pub stopword_filtering: bool,

    /// Score gaps on the rayon thread pool. Results are identical to the
    /// sequential path.
    pub parallel_scoring: bool,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            block_size: 20,
            comparison_window: 1,
            smoothing_window: 3,
            smoothing_method: SmoothingMethod::MovingAverage,
            similarity_metric: SimilarityMetric::Cosine,
            cutoff_policy: CutoffPolicy::Classic,
            threshold_constant: 2.0,
            min_duration: 15.0,
            max_duration: 900.0,
            target_duration: 60.0,
            stopword_filtering: true,
            parallel_scoring: false,
        }
    }
}

impl SegmenterConfig {
    /// Configuration for short vertical clips (15-90 s).
    pub fn short_form() -> Self {
        Self {
            block_size: 10,
            smoothing_window: 3,
            cutoff_policy: CutoffPolicy::Low,
            min_duration: 15.0,
            max_duration: 90.0,
            target_duration: 45.0,
            ..Default::default()
        }
    }

    /// Configuration for long segments such as podcast chapters.
    pub fn long_form() -> Self {
        Self {
            block_size: 40,
            comparison_window: 2,
            smoothing_window: 5,
            cutoff_policy: CutoffPolicy::High,
            min_duration: 180.0,
            max_duration: 1800.0,
            target_duration: 600.0,
            ..Default::default()
        }
    }

    /// Create config from environment variables.
    ///
    /// Reads `CLIPSEG_*` variables; unset variables keep the defaults and
    /// unparsable ones log a warning and keep the defaults. Durations accept
    /// `SS`, `MM:SS` or `HH:MM:SS(.mmm)`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let count = |key: &str, default: usize| match read(key) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(variable = key, value = %raw, "Invalid count, using default {}", default);
                default
            }),
            None => default,
        };

        let number = |key: &str, default: f64| match read(key) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(variable = key, value = %raw, "Invalid number, using default {}", default);
                default
            }),
            None => default,
        };

        let seconds = |key: &str, default: f64| match read(key) {
            Some(raw) => parse_timestamp(&raw).unwrap_or_else(|e| {
                warn!(variable = key, value = %raw, error = %e, "Invalid duration, using default {}s", default);
                default
            }),
            None => default,
        };

        let flag = |key: &str, default: bool| match read(key) {
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    warn!(variable = key, value = %raw, "Invalid flag, using default {}", default);
                    default
                }
            },
            None => default,
        };

        fn named<T: Copy>(
            raw: Option<String>,
            key: &str,
            default: T,
            parse: fn(&str) -> Option<T>,
        ) -> T {
            match raw {
                Some(raw) => parse(&raw).unwrap_or_else(|| {
                    warn!(variable = key, value = %raw, "Unknown option, using default");
                    default
                }),
                None => default,
            }
        }

        Self {
            block_size: count("CLIPSEG_BLOCK_SIZE", defaults.block_size),
            comparison_window: count("CLIPSEG_COMPARISON_WINDOW", defaults.comparison_window),
            smoothing_window: count("CLIPSEG_SMOOTHING_WINDOW", defaults.smoothing_window),
            smoothing_method: named(
                read("CLIPSEG_SMOOTHING_METHOD"),
                "CLIPSEG_SMOOTHING_METHOD",
                defaults.smoothing_method,
                SmoothingMethod::from_name,
            ),
            similarity_metric: named(
                read("CLIPSEG_SIMILARITY_METRIC"),
                "CLIPSEG_SIMILARITY_METRIC",
                defaults.similarity_metric,
                SimilarityMetric::from_name,
            ),
            cutoff_policy: named(
                read("CLIPSEG_CUTOFF_POLICY"),
                "CLIPSEG_CUTOFF_POLICY",
                defaults.cutoff_policy,
                CutoffPolicy::from_name,
            ),
            threshold_constant: number("CLIPSEG_THRESHOLD_CONSTANT", defaults.threshold_constant),
            min_duration: seconds("CLIPSEG_MIN_DURATION", defaults.min_duration),
            max_duration: seconds("CLIPSEG_MAX_DURATION", defaults.max_duration),
            target_duration: seconds("CLIPSEG_TARGET_DURATION", defaults.target_duration),
            stopword_filtering: flag("CLIPSEG_STOPWORDS", defaults.stopword_filtering),
            parallel_scoring: flag("CLIPSEG_PARALLEL", defaults.parallel_scoring),
        }
    }

    /// Check every option; the first violation is returned.
    pub fn validate(&self) -> SegmentationResult<()> {
        if self.block_size == 0 {
            return Err(SegmentationError::invalid_config(
                "block_size",
                "must be at least 1",
            ));
        }
        if self.comparison_window == 0 {
            return Err(SegmentationError::invalid_config(
                "comparison_window",
                "must be at least 1",
            ));
        }
        if self.smoothing_window == 0 {
            return Err(SegmentationError::invalid_config(
                "smoothing_window",
                "must be at least 1",
            ));
        }
        if !(self.threshold_constant.is_finite() && self.threshold_constant > 0.0) {
            return Err(SegmentationError::invalid_config(
                "threshold_constant",
                format!("must be positive, got {}", self.threshold_constant),
            ));
        }
        if !(self.min_duration.is_finite() && self.min_duration >= 0.0) {
            return Err(SegmentationError::invalid_config(
                "min_duration",
                format!("must be non-negative, got {}", self.min_duration),
            ));
        }
        if !(self.max_duration.is_finite() && self.max_duration > 0.0) {
            return Err(SegmentationError::invalid_config(
                "max_duration",
                format!("must be positive, got {}", self.max_duration),
            ));
        }
        if self.min_duration > self.max_duration {
            return Err(SegmentationError::invalid_config(
                "min_duration",
                format!(
                    "{} exceeds max_duration {}",
                    self.min_duration, self.max_duration
                ),
            ));
        }
        if !(self.target_duration.is_finite() && self.target_duration > 0.0) {
            return Err(SegmentationError::invalid_config(
                "target_duration",
                format!("must be positive, got {}", self.target_duration),
            ));
        }
        Ok(())
    }

    /// Target duration clamped into the duration bounds.
    pub fn effective_target(&self) -> f64 {
        self.target_duration
            .max(self.min_duration)
            .min(self.max_duration)
    }

    /// Builder-style setter for block size.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Builder-style setter for the comparison window.
    pub fn with_comparison_window(mut self, blocks: usize) -> Self {
        self.comparison_window = blocks;
        self
    }

    /// Builder-style setter for smoothing width and method.
    pub fn with_smoothing(mut self, window: usize, method: SmoothingMethod) -> Self {
        self.smoothing_window = window;
        self.smoothing_method = method;
        self
    }

    pub fn with_similarity_metric(mut self, metric: SimilarityMetric) -> Self {
        self.similarity_metric = metric;
        self
    }

    pub fn with_cutoff_policy(mut self, policy: CutoffPolicy) -> Self {
        self.cutoff_policy = policy;
        self
    }

    pub fn with_threshold_constant(mut self, constant: f64) -> Self {
        self.threshold_constant = constant;
        self
    }

    /// Builder-style setter for the duration bounds (seconds).
    pub fn with_duration_bounds(mut self, min_duration: f64, max_duration: f64) -> Self {
        self.min_duration = min_duration;
        self.max_duration = max_duration;
        self
    }

    pub fn with_target_duration(mut self, seconds: f64) -> Self {
        self.target_duration = seconds;
        self
    }

    pub fn with_stopword_filtering(mut self, enabled: bool) -> Self {
        self.stopword_filtering = enabled;
        self
    }

    pub fn with_parallel_scoring(mut self, enabled: bool) -> Self {
        self.parallel_scoring = enabled;
        self
    }
}
