//! Pearson correlation between metrics.
//!
//! Unlike the descriptive statistics, correlation never reports "not
//! computable": matrices and radar profiles need a value in every cell, so
//! fewer than two paired observations (or a zero-variance side) yields 0.

use serde::Serialize;

use crate::collectors::CollectorRegistry;
use crate::model::{METRIC_CHLORINE, METRIC_CONDUCTIVITY, METRIC_PH, METRIC_TURBIDITY, Sample};

/// Metric pairs compared in per-collector correlation profiles.
pub const DEFAULT_PROFILE_PAIRS: &[(&str, &str)] = &[
    (METRIC_CHLORINE, METRIC_CONDUCTIVITY),
    (METRIC_CHLORINE, METRIC_PH),
    (METRIC_CHLORINE, METRIC_TURBIDITY),
    (METRIC_CONDUCTIVITY, METRIC_PH),
    (METRIC_CONDUCTIVITY, METRIC_TURBIDITY),
    (METRIC_PH, METRIC_TURBIDITY),
];

/// Pearson's r over index-aligned series, skipping any index where either
/// side is absent.
pub fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((*x, *y)),
            _ => None,
        })
        .collect();
    if pairs.len() < 2 {
        return 0.0;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for &(x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return 0.0;
    }
    (cov / denom).clamp(-1.0, 1.0)
}

/// Index-aligned series of `metric` over `samples`.
fn series<'a, I>(samples: I, metric: &str) -> Vec<Option<f64>>
where
    I: IntoIterator<Item = &'a Sample>,
{
    samples.into_iter().map(|s| s.metric(metric)).collect()
}

/// Square, symmetric metric × metric correlation matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub metrics: Vec<String>,
    /// `values[i][j]` is r between `metrics[i]` and `metrics[j]`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.metrics.iter().position(|m| m == a)?;
        let j = self.metrics.iter().position(|m| m == b)?;
        Some(self.values[i][j])
    }
}

/// Correlates every pair of `metrics` across the whole population.
pub fn correlation_matrix(samples: &[Sample], metrics: &[&str]) -> CorrelationMatrix {
    let columns: Vec<Vec<Option<f64>>> = metrics.iter().map(|m| series(samples, m)).collect();
    let k = metrics.len();
    let mut values = vec![vec![0.0; k]; k];
    for i in 0..k {
        for j in i..k {
            let r = pearson(&columns[i], &columns[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }
    CorrelationMatrix {
        metrics: metrics.iter().map(|m| m.to_string()).collect(),
        values,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairCorrelation {
    pub metric_a: String,
    pub metric_b: String,
    pub r: f64,
}

/// One collector's correlations across a fixed set of metric pairs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationProfile {
    pub collector_id: String,
    pub pairs: Vec<PairCorrelation>,
}

/// Builds a profile for every registered collector, in registry order.
pub fn collector_profiles(
    samples: &[Sample],
    registry: &CollectorRegistry,
    pairs: &[(&str, &str)],
) -> Vec<CorrelationProfile> {
    registry
        .iter()
        .map(|collector| {
            let own: Vec<&Sample> = samples
                .iter()
                .filter(|s| s.collector_id == collector.id)
                .collect();
            CorrelationProfile {
                collector_id: collector.id.clone(),
                pairs: pairs
                    .iter()
                    .map(|&(a, b)| PairCorrelation {
                        metric_a: a.to_string(),
                        metric_b: b.to_string(),
                        r: pearson(&series(own.iter().copied(), a), &series(own.iter().copied(), b)),
                    })
                    .collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Location, TRACKED_METRICS};
    use chrono::{TimeZone, Utc};

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    fn sample(collector: &str, chlorine: Option<f64>, ph: Option<f64>) -> Sample {
        Sample {
            id: format!("{}-{:?}", collector, chlorine),
            collector_id: collector.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap(),
            location: Location {
                latitude: 0.0,
                longitude: 0.0,
                accuracy_m: 3.0,
                address: None,
            },
            metrics: [
                (METRIC_CHLORINE.to_string(), chlorine),
                (METRIC_PH.to_string(), ph),
            ]
            .into_iter()
            .collect(),
            notes: None,
        }
    }

    #[test]
    fn test_self_correlation_is_one() {
        let x = some(&[0.2, 0.5, 0.9, 1.4, 0.7]);
        assert!((pearson(&x, &x) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_negated_series_is_minus_one() {
        let x = some(&[0.2, 0.5, 0.9, 1.4, 0.7]);
        let neg: Vec<Option<f64>> = x.iter().map(|v| v.map(|v| -v)).collect();
        assert!((pearson(&x, &neg) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fewer_than_two_pairs_falls_back_to_zero() {
        assert_eq!(pearson(&[], &[]), 0.0);
        assert_eq!(pearson(&some(&[1.0]), &some(&[2.0])), 0.0);
        // Only index 1 is paired.
        assert_eq!(
            pearson(&[Some(1.0), Some(2.0), None], &[None, Some(3.0), Some(4.0)]),
            0.0
        );
    }

    #[test]
    fn test_absent_pairs_are_skipped() {
        let a = [Some(1.0), None, Some(2.0), Some(3.0)];
        let b = [Some(2.0), Some(100.0), Some(4.0), Some(6.0)];
        assert!((pearson(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_series_falls_back_to_zero() {
        assert_eq!(pearson(&some(&[5.0, 5.0, 5.0]), &some(&[1.0, 2.0, 3.0])), 0.0);
    }

    #[test]
    fn test_matrix_is_square_and_symmetric() {
        let samples = vec![
            sample("north", Some(0.5), Some(7.4)),
            sample("north", Some(0.8), Some(7.1)),
            sample("south", Some(1.1), Some(6.9)),
            sample("south", None, Some(7.0)),
        ];
        let m = correlation_matrix(&samples, TRACKED_METRICS);
        assert_eq!(m.values.len(), TRACKED_METRICS.len());
        for row in &m.values {
            assert_eq!(row.len(), TRACKED_METRICS.len());
        }
        for i in 0..m.values.len() {
            for j in 0..m.values.len() {
                assert_eq!(m.values[i][j], m.values[j][i]);
            }
        }
        assert!((m.get(METRIC_CHLORINE, METRIC_CHLORINE).unwrap() - 1.0).abs() < 1e-12);
        assert!(m.get(METRIC_CHLORINE, METRIC_PH).unwrap() < -0.9);
        assert_eq!(m.get(METRIC_TURBIDITY, METRIC_PH), Some(0.0), "no turbidity data");
        assert_eq!(m.get("nitrate", METRIC_PH), None);
    }

    #[test]
    fn test_profiles_follow_registry_order() {
        let samples = vec![
            sample("north", Some(0.5), Some(7.0)),
            sample("north", Some(1.0), Some(8.0)),
            sample("south", Some(0.5), Some(8.0)),
            sample("south", Some(1.0), Some(7.0)),
        ];
        let registry = CollectorRegistry::from_ids(&["south", "north", "idle"]);
        let profiles = collector_profiles(&samples, &registry, &[(METRIC_CHLORINE, METRIC_PH)]);
        assert_eq!(profiles.len(), 3);
        assert_eq!(profiles[0].collector_id, "south");
        assert!((profiles[0].pairs[0].r + 1.0).abs() < 1e-12);
        assert!((profiles[1].pairs[0].r - 1.0).abs() < 1e-12);
        assert_eq!(profiles[2].pairs[0].r, 0.0, "collector without samples gets the fallback");
    }

    #[test]
    fn test_default_profile_pairs_cover_all_tracked_pairs() {
        let k = TRACKED_METRICS.len();
        assert_eq!(DEFAULT_PROFILE_PAIRS.len(), k * (k - 1) / 2);
    }
}
