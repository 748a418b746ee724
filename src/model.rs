//! Core data types for the water-quality audit engine.
//!
//! This module defines the shared domain model imported by all other modules.
//! It contains no statistics and no I/O, only types and the accessors every
//! consumer uses to pull present values out of a sample.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Metric keys
// ---------------------------------------------------------------------------

/// Free chlorine, in mg/L.
pub const METRIC_CHLORINE: &str = "chlorine";

/// Electrical conductivity, in µS/cm.
pub const METRIC_CONDUCTIVITY: &str = "ec";

/// pH, unitless.
pub const METRIC_PH: &str = "ph";

/// Turbidity, in NTU.
pub const METRIC_TURBIDITY: &str = "turbidity";

/// Metrics audited by default, in display order.
pub const TRACKED_METRICS: &[&str] = &[
    METRIC_CHLORINE,
    METRIC_CONDUCTIVITY,
    METRIC_PH,
    METRIC_TURBIDITY,
];

// ---------------------------------------------------------------------------
// Sample types
// ---------------------------------------------------------------------------

/// Where a sample was taken, as reported by the collecting device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// Reported GPS accuracy radius, in meters.
    pub accuracy_m: f64,
    /// Reverse-geocoded street address, when the entry layer resolved one.
    pub address: Option<String>,
}

/// A single field submission.
///
/// Metrics are optional: a key may be missing entirely or present with no
/// value, and both mean "not measured". Use [`Sample::metric`] rather than
/// reading the map directly so absent entries are filtered consistently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub id: String,
    pub collector_id: String,
    pub timestamp: DateTime<Utc>,
    pub location: Location,
    pub metrics: BTreeMap<String, Option<f64>>,
    pub notes: Option<String>,
}

impl Sample {
    /// Returns the value recorded for `key`, or `None` if it is absent or
    /// not a finite number.
    pub fn metric(&self, key: &str) -> Option<f64> {
        self.metrics
            .get(key)
            .copied()
            .flatten()
            .filter(|v| v.is_finite())
    }
}

/// Present values of `key` across `samples`, in input order.
pub fn metric_values(samples: &[Sample], key: &str) -> Vec<f64> {
    samples.iter().filter_map(|s| s.metric(key)).collect()
}

/// Samples submitted by `collector_id`, sorted ascending by timestamp.
///
/// The sort is stable, so samples sharing a timestamp keep their input order.
pub fn samples_for_collector<'a>(samples: &'a [Sample], collector_id: &str) -> Vec<&'a Sample> {
    let mut own: Vec<&Sample> = samples
        .iter()
        .filter(|s| s.collector_id == collector_id)
        .collect();
    own.sort_by_key(|s| s.timestamp);
    own
}

// ---------------------------------------------------------------------------
// Derived result types
// ---------------------------------------------------------------------------

/// Descriptive statistics for one metric.
///
/// Only ever constructed from at least two values; callers receive
/// `Option<StatResult>` and `None` means insufficient data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatResult {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// 95% confidence interval for the mean, `(lower, upper)`.
    pub ci95: (f64, f64),
    pub skewness: f64,
    /// Excess kurtosis (normal = 0).
    pub kurtosis: f64,
    pub jarque_bera: f64,
    pub is_normal: bool,
}

/// One bar of a digit-frequency series, in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DigitBin {
    pub digit: u8,
    pub actual_pct: f64,
    pub expected_pct: f64,
}

/// Integrity outcome for one metric of one collector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricScore {
    pub metric: String,
    pub sample_count: usize,
    /// `max(0, 100 - penalty)`.
    pub integrity: f64,
    pub flags: Vec<String>,
}

/// Final trust ranking row for a collector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    pub collector_id: String,
    pub sample_count: usize,
    /// Composite integrity score in [0, 100].
    pub score: f64,
    pub flags: Vec<String>,
    pub metric_scores: Vec<MetricScore>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when reading a sample snapshot exported by the
/// data-entry layer.
#[derive(Debug, PartialEq)]
pub enum IngestError {
    /// The export could not be deserialized.
    ParseError(String),
    /// A record's epoch-millisecond timestamp is outside chrono's range.
    InvalidTimestamp { id: String, millis: i64 },
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            IngestError::InvalidTimestamp { id, millis } => {
                write!(f, "Invalid timestamp for sample {}: {} ms", id, millis)
            }
        }
    }
}

impl std::error::Error for IngestError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
