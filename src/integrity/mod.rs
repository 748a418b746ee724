//! Collector integrity scoring and ranking.
//!
//! A collector's base score is the average per-metric integrity (see
//! `penalties`). Movement checks (see `movement`) then subtract flat
//! penalties: once for the first impossible travel speed and, when the
//! gradient rule is enabled, once per implausible short-range jump.
//! Scores are clamped to [0, 100] and ranked descending, ties keeping the
//! registry's enumeration order.
//!
//! Every call recomputes from the snapshot it is given.

pub mod movement;
pub mod penalties;

use crate::analysis::statistics::describe_with_critical;
use crate::collectors::CollectorRegistry;
use crate::config::ScoringThresholds;
use crate::logging::{self, Component};
use crate::model::{RankingEntry, Sample, StatResult, TRACKED_METRICS, samples_for_collector};

use movement::{first_speed_violation, gradient_violations};
use penalties::score_metric;

/// Population statistics for each audited metric.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationStats {
    entries: Vec<(String, Option<StatResult>)>,
}

impl PopulationStats {
    /// Describes each metric over every sample in the snapshot.
    pub fn compute(samples: &[Sample], metrics: &[&str], jb_critical: f64) -> Self {
        let entries = metrics
            .iter()
            .map(|m| {
                let values: Vec<f64> = samples.iter().filter_map(|s| s.metric(m)).collect();
                (m.to_string(), describe_with_critical(&values, jb_critical))
            })
            .collect();
        Self { entries }
    }

    pub fn metrics(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(m, _)| m.as_str())
    }

    pub fn get(&self, metric: &str) -> Option<&StatResult> {
        self.entries
            .iter()
            .find(|(m, _)| m == metric)
            .and_then(|(_, stats)| stats.as_ref())
    }
}

/// Scores one collector against the population.
pub fn score_collector(
    collector_id: &str,
    samples: &[Sample],
    population: &PopulationStats,
    thresholds: &ScoringThresholds,
) -> RankingEntry {
    // A collector with no samples trips no rule and keeps a clean score.
    let own = samples_for_collector(samples, collector_id);
    let metric_scores: Vec<_> = population
        .metrics()
        .map(|metric| {
            let values: Vec<f64> = own.iter().filter_map(|s| s.metric(metric)).collect();
            score_metric(metric, &values, population.get(metric), thresholds)
        })
        .collect();

    let mut flags: Vec<String> = metric_scores.iter().flat_map(|m| m.flags.clone()).collect();
    let mut score = if metric_scores.is_empty() {
        100.0
    } else {
        metric_scores.iter().map(|m| m.integrity).sum::<f64>() / metric_scores.len() as f64
    };

    if let Some(violation) = first_speed_violation(&own, thresholds.max_speed_kmh) {
        flags.push(violation.flag());
        score -= thresholds.speed_penalty;
    }

    for violation in gradient_violations(&own, &thresholds.gradient) {
        flags.push(violation.flag());
        score -= thresholds.gradient.penalty;
    }

    let score = score.clamp(0.0, 100.0);
    logging::debug(
        Component::Integrity,
        Some(collector_id),
        &format!("score {:.1} from {} sample(s), {} flag(s)", score, own.len(), flags.len()),
    );

    RankingEntry {
        collector_id: collector_id.to_string(),
        sample_count: own.len(),
        score,
        flags,
        metric_scores,
    }
}

/// Ranks every registered collector over the default tracked metrics.
pub fn rank_collectors(
    samples: &[Sample],
    registry: &CollectorRegistry,
    thresholds: &ScoringThresholds,
) -> Vec<RankingEntry> {
    rank_collectors_on(samples, registry, thresholds, TRACKED_METRICS)
}

/// Ranks every registered collector over `metrics`, best score first.
pub fn rank_collectors_on(
    samples: &[Sample],
    registry: &CollectorRegistry,
    thresholds: &ScoringThresholds,
    metrics: &[&str],
) -> Vec<RankingEntry> {
    let unregistered = samples
        .iter()
        .filter(|s| !registry.contains(&s.collector_id))
        .count();
    if unregistered > 0 {
        logging::warn(
            Component::Integrity,
            None,
            &format!(
                "{} sample(s) from unregistered collectors excluded from ranking",
                unregistered
            ),
        );
    }

    let population = PopulationStats::compute(samples, metrics, thresholds.jarque_bera_critical);
    let mut entries: Vec<RankingEntry> = registry
        .iter()
        .map(|c| score_collector(&c.id, samples, &population, thresholds))
        .collect();

    // Stable: equal scores keep registry order.
    entries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    logging::log_ranking_summary(&entries);
    entries
}
