//! Digit-pattern analysis: Benford's Law on first significant digits and a
//! uniformity check on the last recorded decimal.
//!
//! Hand-entered or invented readings tend to drift away from Benford's
//! logarithmic first-digit curve and to favor particular final digits
//! (0 and 5 especially). Both series are returned as percentages so they can
//! be charted directly.

use crate::model::DigitBin;

/// Benford's expected first-digit percentages for digits 1–9.
pub const BENFORD_EXPECTED_PCT: [f64; 9] = [30.1, 17.6, 12.5, 9.7, 7.9, 6.7, 5.8, 5.1, 4.6];

/// Uniform expectation for each of the ten last digits.
pub const LAST_DIGIT_EXPECTED_PCT: f64 = 10.0;

/// First significant digit of `value`, read from its decimal rendering with
/// every `0` and the decimal point removed.
pub fn first_significant_digit(value: f64) -> Option<u8> {
    let rendered = value.abs().to_string();
    rendered
        .chars()
        .find(|&c| c != '0' && c != '.')
        .and_then(|c| c.to_digit(10))
        .map(|d| d as u8)
}

/// Final digit of `value` rendered to two decimal places.
pub fn last_recorded_digit(value: f64) -> Option<u8> {
    format!("{:.2}", value)
        .chars()
        .last()
        .and_then(|c| c.to_digit(10))
        .map(|d| d as u8)
}

/// Actual vs. Benford-expected first-digit percentages for digits 1–9.
///
/// Returns an empty series when no value yields a usable digit.
pub fn benford_distribution(values: &[f64]) -> Vec<DigitBin> {
    let mut counts = [0usize; 9];
    let mut total = 0usize;
    for &v in values {
        if let Some(d) = first_significant_digit(v) {
            counts[(d - 1) as usize] += 1;
            total += 1;
        }
    }
    if total == 0 {
        return Vec::new();
    }

    counts
        .iter()
        .zip(BENFORD_EXPECTED_PCT)
        .enumerate()
        .map(|(i, (&count, expected_pct))| DigitBin {
            digit: (i + 1) as u8,
            actual_pct: count as f64 / total as f64 * 100.0,
            expected_pct,
        })
        .collect()
}

/// Σ |actual% − expected%| over a Benford series. Zero for an empty series.
pub fn benford_deviation(distribution: &[DigitBin]) -> f64 {
    distribution
        .iter()
        .map(|b| (b.actual_pct - b.expected_pct).abs())
        .sum()
}

/// Actual vs. uniform percentages for last digits 0–9.
///
/// Returns an empty series when no value yields a usable digit.
pub fn last_digit_distribution(values: &[f64]) -> Vec<DigitBin> {
    let mut counts = [0usize; 10];
    let mut total = 0usize;
    for &v in values {
        if let Some(d) = last_recorded_digit(v) {
            counts[d as usize] += 1;
            total += 1;
        }
    }
    if total == 0 {
        return Vec::new();
    }

    counts
        .iter()
        .enumerate()
        .map(|(digit, &count)| DigitBin {
            digit: digit as u8,
            actual_pct: count as f64 / total as f64 * 100.0,
            expected_pct: LAST_DIGIT_EXPECTED_PCT,
        })
        .collect()
}

/// `max(0, 100 − 2 × Σ|actual% − 10%|)` over a last-digit series.
///
/// 100 means perfectly uniform final digits. `None` for an empty series.
pub fn digit_preference_score(distribution: &[DigitBin]) -> Option<f64> {
    if distribution.is_empty() {
        return None;
    }
    let spread: f64 = distribution
        .iter()
        .map(|b| (b.actual_pct - LAST_DIGIT_EXPECTED_PCT).abs())
        .sum();
    Some((100.0 - 2.0 * spread).max(0.0))
}
