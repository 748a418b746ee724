//! Descriptive statistics and the Jarque–Bera normality test.
//!
//! The reported standard deviation and confidence interval use the sample
//! (n − 1) variance, while skewness and kurtosis are normalized by the
//! population (n) variance. Both conventions are kept as-is.

use crate::model::{Sample, StatResult, metric_values};

/// Normal-approximation critical value for a two-sided 95% interval.
pub const Z_95: f64 = 1.96;

/// Chi-square(2) critical value at 5% significance.
pub const JARQUE_BERA_CRITICAL: f64 = 5.99;

/// Describes `values` with the default Jarque–Bera critical value.
///
/// Returns `None` when fewer than two values are supplied.
pub fn describe(values: &[f64]) -> Option<StatResult> {
    describe_with_critical(values, JARQUE_BERA_CRITICAL)
}

/// Describes `values`, judging normality as `JB < jb_critical`.
///
/// A zero-variance series has skewness, kurtosis and JB of 0 and is
/// never reported as normal.
pub fn describe_with_critical(values: &[f64], jb_critical: f64) -> Option<StatResult> {
    if values.len() < 2 {
        return None;
    }

    let n = values.len() as f64;
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let mean = values.iter().sum::<f64>() / n;

    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    };

    let sum_sq = values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>();
    let sample_variance = sum_sq / (n - 1.0);
    let std_dev = sample_variance.sqrt();

    let margin = Z_95 * (std_dev / n.sqrt());
    let ci95 = (mean - margin, mean + margin);

    let pop_variance = sample_variance * (n - 1.0) / n;
    let (skewness, kurtosis) = if pop_variance > 0.0 {
        let m3 = values.iter().map(|&x| (x - mean).powi(3)).sum::<f64>() / n;
        let m4 = values.iter().map(|&x| (x - mean).powi(4)).sum::<f64>() / n;
        (
            m3 / pop_variance.powf(1.5),
            m4 / (pop_variance * pop_variance) - 3.0, // excess kurtosis
        )
    } else {
        (0.0, 0.0)
    };

    let jarque_bera = (n / 6.0) * (skewness.powi(2) + kurtosis.powi(2) / 4.0);
    let is_normal = pop_variance > 0.0 && jarque_bera < jb_critical;

    Some(StatResult {
        count: values.len(),
        mean,
        median,
        std_dev,
        min,
        max,
        ci95,
        skewness,
        kurtosis,
        jarque_bera,
        is_normal,
    })
}

/// Describes the present values of `metric` across `samples`.
pub fn describe_metric(samples: &[Sample], metric: &str) -> Option<StatResult> {
    describe(&metric_values(samples, metric))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::quantile::probit;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_fewer_than_two_values_is_not_computable() {
        assert!(describe(&[]).is_none());
        assert!(describe(&[4.2]).is_none());
        assert!(describe(&[4.2, 4.3]).is_some());
    }

    #[test]
    fn test_median_odd_and_even_lengths() {
        let odd = describe(&[9.0, 1.0, 5.0]).unwrap();
        assert_eq!(odd.median, 5.0, "odd length takes the middle sorted value");

        let even = describe(&[9.0, 1.0, 5.0, 3.0]).unwrap();
        assert_eq!(even.median, 4.0, "even length averages the two central values");
    }

    #[test]
    fn test_min_max_and_mean() {
        let r = describe(&[3.0, -1.0, 7.0, 1.0]).unwrap();
        assert_eq!(r.min, -1.0);
        assert_eq!(r.max, 7.0);
        assert!((r.mean - 2.5).abs() < EPS);
        assert_eq!(r.count, 4);
    }

    #[test]
    fn test_sample_standard_deviation_uses_bessel_correction() {
        // Σ(x − 5)² = 32 over n − 1 = 7.
        let r = describe(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((r.std_dev - (32.0f64 / 7.0).sqrt()).abs() < EPS, "got {}", r.std_dev);
    }

    #[test]
    fn test_confidence_interval_uses_fixed_z() {
        let r = describe(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let margin = 1.96 * r.std_dev / 5.0f64.sqrt();
        assert!((r.ci95.0 - (3.0 - margin)).abs() < EPS);
        assert!((r.ci95.1 - (3.0 + margin)).abs() < EPS);
    }

    #[test]
    fn test_symmetric_sequence_has_zero_skew() {
        let r = describe(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!(r.skewness.abs() < EPS, "got {}", r.skewness);
        // Population-normalized excess kurtosis of 1..=5.
        assert!((r.kurtosis + 1.3).abs() < EPS, "got {}", r.kurtosis);
    }

    #[test]
    fn test_moments_use_population_variance() {
        let r = describe(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((r.skewness - 0.65625).abs() < EPS, "got {}", r.skewness);
        assert!((r.kurtosis + 0.21875).abs() < EPS, "got {}", r.kurtosis);
    }

    #[test]
    fn test_strongly_skewed_sample_is_not_normal() {
        let mut values = vec![1.0; 9];
        values.push(100.0);
        let r = describe(&values).unwrap();
        assert!(r.jarque_bera > JARQUE_BERA_CRITICAL, "JB = {}", r.jarque_bera);
        assert!(!r.is_normal);
    }

    #[test]
    fn test_normal_quantile_sample_is_normal() {
        let n = 60;
        let values: Vec<f64> = (0..n)
            .map(|i| 7.0 + 0.5 * probit((i as f64 + 0.5) / n as f64))
            .collect();
        let r = describe(&values).unwrap();
        assert!(r.jarque_bera < JARQUE_BERA_CRITICAL, "JB = {}", r.jarque_bera);
        assert!(r.is_normal);
    }

    #[test]
    fn test_verdict_tracks_critical_value() {
        let r = describe(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!(describe_with_critical(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], r.jarque_bera + 1e-6)
            .unwrap()
            .is_normal);
        assert!(!describe_with_critical(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], r.jarque_bera)
            .unwrap()
            .is_normal, "verdict is strictly less than");
    }

    #[test]
    fn test_constant_series_is_guarded() {
        let r = describe(&[3.0, 3.0, 3.0, 3.0]).unwrap();
        assert_eq!(r.std_dev, 0.0);
        assert_eq!(r.skewness, 0.0);
        assert_eq!(r.kurtosis, 0.0);
        assert_eq!(r.jarque_bera, 0.0);
        assert!(!r.is_normal, "a constant series is not a normal sample");
        assert!(r.ci95.0.is_finite() && r.ci95.1.is_finite());
    }
}
