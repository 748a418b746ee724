//! Inverse standard-normal CDF and quantile-quantile pairing.
//!
//! The probit uses Acklam's rational approximation: a polynomial ratio in
//! q² near the median and a second ratio in √(−2 ln p) in the tails. The
//! regions split at |p − 0.5| = 0.42, which keeps absolute error under 1e-4.

use serde::Serialize;

/// Central-region split on |p − 0.5|.
const CENTRAL_LIMIT: f64 = 0.42;

const A: [f64; 6] = [
    -39.6968302866538,
    220.946098424520,
    -275.928510446969,
    138.357751867269,
    -30.6647980661472,
    2.50662827745924,
];

const B: [f64; 6] = [
    -54.4760987982241,
    161.585036825289,
    -155.698979859887,
    66.8013118877197,
    -13.2806815528857,
    1.0,
];

const C: [f64; 6] = [
    -0.00778489400243029,
    -0.322396458041137,
    -2.40075827716184,
    -2.54973253934373,
    4.37466414146497,
    2.93816398269878,
];

const D: [f64; 5] = [
    0.00778469570904146,
    0.32246712907004,
    2.445134137143,
    3.75440866190742,
    1.0,
];

/// Horner evaluation, highest-order coefficient first.
fn horner(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().fold(0.0, |acc, &c| acc * x + c)
}

/// Standard-normal quantile for probability `p`.
///
/// Returns −∞ / +∞ at exactly 0 / 1 and NaN outside [0, 1].
pub fn probit(p: f64) -> f64 {
    if !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }

    let q = p - 0.5;
    if q.abs() <= CENTRAL_LIMIT {
        let r = q * q;
        return q * horner(&A, r) / horner(&B, r);
    }

    let tail = if q < 0.0 { p } else { 1.0 - p };
    let r = (-2.0 * tail.ln()).sqrt();
    // Positive magnitude of the lower-tail quantile.
    let x = -horner(&C, r) / horner(&D, r);
    if q < 0.0 { -x } else { x }
}

/// One point of a normal Q-Q plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QqPoint {
    /// Standard-normal quantile at the value's plotting position.
    pub theoretical: f64,
    pub observed: f64,
}

/// Pairs each value (sorted ascending) with the normal quantile at plotting
/// position `(i + 0.5) / n`.
pub fn qq_pairs(values: &[f64]) -> Vec<QqPoint> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len() as f64;
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, observed)| QqPoint {
            theoretical: probit((i as f64 + 0.5) / n),
            observed,
        })
        .collect()
}
