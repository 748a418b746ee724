//! Per-metric penalty rules.
//!
//! Each rule compares one collector's readings of a metric against the
//! whole population and adds penalty points independently. Rules that need
//! a statistic that is not computable (fewer than two values) or that would
//! divide by zero are skipped rather than guessed.

use crate::analysis::digits::{benford_deviation, benford_distribution};
use crate::analysis::statistics::describe_with_critical;
use crate::config::ScoringThresholds;
use crate::model::{MetricScore, StatResult};

/// Penalty points and flags accumulated for one metric.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricPenalty {
    pub points: f64,
    pub flags: Vec<String>,
}

impl MetricPenalty {
    fn add(&mut self, points: f64, flag: String) {
        self.points += points;
        self.flags.push(flag);
    }
}

/// Collector σ / population σ, when the population σ is non-zero.
pub fn variance_ratio(collector: &StatResult, population: &StatResult) -> Option<f64> {
    if population.std_dev > 0.0 {
        Some(collector.std_dev / population.std_dev)
    } else {
        None
    }
}

/// |collector mean − population mean| / population mean, when the
/// population mean is non-zero. A negative population mean gives a negative
/// ratio, which never exceeds the threshold.
pub fn mean_deviation(collector: &StatResult, population: &StatResult) -> Option<f64> {
    if population.mean != 0.0 {
        Some((collector.mean - population.mean).abs() / population.mean)
    } else {
        None
    }
}

/// Applies every per-metric rule to `values` (the collector's present
/// readings of `metric`).
pub fn metric_penalty(
    metric: &str,
    values: &[f64],
    population: Option<&StatResult>,
    thresholds: &ScoringThresholds,
) -> MetricPenalty {
    let mut penalty = MetricPenalty::default();
    let count = values.len();
    let own = describe_with_critical(values, thresholds.jarque_bera_critical);

    if let (Some(own), Some(population)) = (own.as_ref(), population) {
        if count > thresholds.variance_sample_floor {
            if let Some(ratio) = variance_ratio(own, population) {
                if ratio < thresholds.variance_ratio_min {
                    penalty.add(
                        thresholds.variance_penalty,
                        format!("{}: suppressed variance (σ ratio {:.2})", metric, ratio),
                    );
                }
            }
        }

        if count > thresholds.mean_sample_floor {
            if let Some(deviation) = mean_deviation(own, population) {
                if deviation > thresholds.mean_deviation_max {
                    penalty.add(
                        thresholds.mean_penalty,
                        format!(
                            "{}: mean deviates {:.0}% from population",
                            metric,
                            deviation * 100.0
                        ),
                    );
                }
            }
        }

        if population.is_normal && !own.is_normal {
            penalty.add(
                thresholds.normality_penalty,
                format!(
                    "{}: non-normal distribution (JB {:.2}) against a normal population",
                    metric, own.jarque_bera
                ),
            );
        }
    }

    let digit_checked = thresholds.benford_metrics.iter().any(|m| m == metric);
    if digit_checked && count > thresholds.benford_sample_floor {
        let deviation = benford_deviation(&benford_distribution(values));
        if deviation > thresholds.benford_deviation_max {
            penalty.add(
                thresholds.benford_penalty,
                format!("{}: Benford deviation {:.1}", metric, deviation),
            );
        }
    }

    penalty
}

/// Scores one metric as `max(0, 100 − penalty)`.
pub fn score_metric(
    metric: &str,
    values: &[f64],
    population: Option<&StatResult>,
    thresholds: &ScoringThresholds,
) -> MetricScore {
    let penalty = metric_penalty(metric, values, population, thresholds);
    MetricScore {
        metric: metric.to_string(),
        sample_count: values.len(),
        integrity: (100.0 - penalty.points).max(0.0),
        flags: penalty.flags,
    }
}
