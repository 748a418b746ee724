//! Audit Report Module
//!
//! Runs every analysis over one sample snapshot and bundles the results
//! the presentation layer consumes: population statistics and digit series
//! per metric, the correlation matrix, collector correlation profiles, and
//! the integrity ranking.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::correlation::{
    CorrelationMatrix, CorrelationProfile, DEFAULT_PROFILE_PAIRS, collector_profiles,
    correlation_matrix,
};
use crate::analysis::digits::{
    benford_deviation, benford_distribution, digit_preference_score, last_digit_distribution,
};
use crate::analysis::statistics::describe_with_critical;
use crate::config::AuditConfig;
use crate::integrity::rank_collectors_on;
use crate::logging::{self, Component};
use crate::model::{DigitBin, RankingEntry, Sample, StatResult, TRACKED_METRICS, metric_values};
use crate::spatial::idw::{GridCell, GridSpec, bounding_box, interpolate_grid};

// ============================================================================
// Report Structures
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub generated_at: String,
    pub sample_count: usize,
    pub metrics: Vec<MetricSummary>,
    pub correlation: CorrelationMatrix,
    pub profiles: Vec<CorrelationProfile>,
    pub rankings: Vec<RankingEntry>,
}

/// Population-level view of one metric.
#[derive(Debug, Clone, Serialize)]
pub struct MetricSummary {
    pub metric: String,
    pub value_count: usize,
    /// `None` when fewer than two values were recorded.
    pub stats: Option<StatResult>,
    pub benford: Vec<DigitBin>,
    pub benford_deviation: f64,
    pub last_digits: Vec<DigitBin>,
    pub digit_preference: Option<f64>,
}

impl AuditReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn ranking_for(&self, collector_id: &str) -> Option<&RankingEntry> {
        self.rankings.iter().find(|e| e.collector_id == collector_id)
    }
}

// ============================================================================
// Runner
// ============================================================================

fn summarize_metric(samples: &[Sample], metric: &str, jb_critical: f64) -> MetricSummary {
    let values = metric_values(samples, metric);
    let stats = describe_with_critical(&values, jb_critical);
    if stats.is_none() {
        logging::debug(
            Component::Stats,
            None,
            &format!("{}: {} value(s), not enough to describe", metric, values.len()),
        );
    }

    let benford = benford_distribution(&values);
    let last_digits = last_digit_distribution(&values);
    let deviation = benford_deviation(&benford);
    logging::debug(
        Component::Digits,
        None,
        &format!("{}: Benford deviation {:.1}", metric, deviation),
    );

    MetricSummary {
        metric: metric.to_string(),
        value_count: values.len(),
        stats,
        benford_deviation: deviation,
        digit_preference: digit_preference_score(&last_digits),
        benford,
        last_digits,
    }
}

/// Audits `samples` with `config`, stamping the report with `now`.
pub fn run_audit(samples: &[Sample], config: &AuditConfig, now: DateTime<Utc>) -> AuditReport {
    let thresholds = &config.thresholds;

    let metrics = TRACKED_METRICS
        .iter()
        .map(|m| summarize_metric(samples, m, thresholds.jarque_bera_critical))
        .collect();

    let correlation = correlation_matrix(samples, TRACKED_METRICS);
    let profiles = collector_profiles(samples, &config.collectors, DEFAULT_PROFILE_PAIRS);
    logging::debug(
        Component::Correlation,
        None,
        &format!(
            "{}x{} matrix, {} collector profile(s)",
            correlation.metrics.len(),
            correlation.metrics.len(),
            profiles.len()
        ),
    );

    let report = AuditReport {
        generated_at: now.to_rfc3339(),
        sample_count: samples.len(),
        metrics,
        correlation,
        profiles,
        rankings: rank_collectors_on(samples, &config.collectors, thresholds, TRACKED_METRICS),
    };

    logging::info(
        Component::Report,
        None,
        &format!(
            "Audit complete: {} sample(s), {} collector(s) ranked",
            report.sample_count,
            report.rankings.len()
        ),
    );
    report
}

/// IDW overlay of `metric` over the samples' bounding box, using the
/// configured interpolation power. Empty when the metric was never recorded.
pub fn metric_overlay(
    samples: &[Sample],
    config: &AuditConfig,
    metric: &str,
    rows: usize,
    cols: usize,
) -> Vec<GridCell> {
    let Some(bounds) = bounding_box(samples, metric) else {
        logging::debug(
            Component::Spatial,
            None,
            &format!("{}: no readings to interpolate", metric),
        );
        return Vec::new();
    };

    let power = config.interpolation.power;
    let cells = interpolate_grid(&GridSpec { bounds, rows, cols }, samples, metric, power);
    logging::debug(
        Component::Spatial,
        None,
        &format!("{}: {} cell(s) at power {}", metric, cells.len(), power),
    );
    cells
}

pub fn print_summary(report: &AuditReport) {
    println!("\n═══════════════════════════════════════════════════════════");
    println!("📊 WATER QUALITY AUDIT ({})", report.generated_at);
    println!("═══════════════════════════════════════════════════════════");
    println!();
    println!("Samples: {}", report.sample_count);
    println!();

    for summary in &report.metrics {
        match &summary.stats {
            Some(s) => println!(
                "  {:<10} n={:<4} mean={:.3} sd={:.3} JB={:.2} {}  Benford Δ={:.1}",
                summary.metric,
                s.count,
                s.mean,
                s.std_dev,
                s.jarque_bera,
                if s.is_normal { "normal" } else { "non-normal" },
                summary.benford_deviation
            ),
            None => println!(
                "  {:<10} n={:<4} insufficient data",
                summary.metric, summary.value_count
            ),
        }
    }

    println!();
    println!("Collector ranking:");
    for (rank, entry) in report.rankings.iter().enumerate() {
        let marker = if entry.flags.is_empty() { "✓" } else { "⚠" };
        println!(
            "  {}. {} {:<12} {:>5.1}  ({} samples)",
            rank + 1,
            marker,
            entry.collector_id,
            entry.score,
            entry.sample_count
        );
        for flag in &entry.flags {
            println!("       - {}", flag);
        }
    }
    println!("═══════════════════════════════════════════════════════════");
}
