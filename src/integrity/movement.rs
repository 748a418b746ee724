//! Spatiotemporal plausibility of a collector's time-ordered samples.
//!
//! Both checks walk consecutive pairs of samples that are already sorted
//! ascending by timestamp and use haversine distance.

use serde::Serialize;

use crate::config::GradientRule;
use crate::model::Sample;
use crate::spatial::geodesy::distance_between;

/// Two consecutive samples implying travel faster than allowed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeedViolation {
    pub from_id: String,
    pub to_id: String,
    pub distance_km: f64,
    pub elapsed_minutes: f64,
    pub speed_kmh: f64,
}

impl SpeedViolation {
    pub fn flag(&self) -> String {
        format!(
            "illegal travel speed: {:.0} km/h ({:.1} km in {:.1} min, {} -> {})",
            self.speed_kmh, self.distance_km, self.elapsed_minutes, self.from_id, self.to_id
        )
    }
}

/// Minutes between two samples; negative if `b` precedes `a`.
pub fn elapsed_minutes(a: &Sample, b: &Sample) -> f64 {
    (b.timestamp - a.timestamp).num_milliseconds() as f64 / 60_000.0
}

/// First consecutive pair whose implied speed exceeds `max_speed_kmh`.
///
/// Pairs with zero elapsed time are skipped.
pub fn first_speed_violation(ordered: &[&Sample], max_speed_kmh: f64) -> Option<SpeedViolation> {
    ordered.windows(2).find_map(|pair| {
        let (a, b) = (pair[0], pair[1]);
        let minutes = elapsed_minutes(a, b);
        if minutes <= 0.0 {
            return None;
        }
        let distance_km = distance_between(&a.location, &b.location) / 1000.0;
        let speed_kmh = distance_km / (minutes / 60.0);
        (speed_kmh > max_speed_kmh).then(|| SpeedViolation {
            from_id: a.id.clone(),
            to_id: b.id.clone(),
            distance_km,
            elapsed_minutes: minutes,
            speed_kmh,
        })
    })
}

/// A metric jumping further than allowed between two nearby samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradientViolation {
    pub from_id: String,
    pub to_id: String,
    pub metric: String,
    pub distance_m: f64,
    pub delta: f64,
}

impl GradientViolation {
    pub fn flag(&self) -> String {
        format!(
            "physically implausible short-range jump: {} changed {:.2} over {:.0} m ({} -> {})",
            self.metric, self.delta, self.distance_m, self.from_id, self.to_id
        )
    }
}

/// Every per-metric jump between consecutive samples lying within the
/// rule's distance band. Returns nothing when the rule is disabled.
pub fn gradient_violations(ordered: &[&Sample], rule: &GradientRule) -> Vec<GradientViolation> {
    if !rule.enabled {
        return Vec::new();
    }

    let mut violations = Vec::new();
    for pair in ordered.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let distance_m = distance_between(&a.location, &b.location);
        if distance_m > rule.max_distance_m || distance_m <= rule.min_distance_m {
            continue;
        }
        for limit in &rule.limits {
            if let (Some(x), Some(y)) = (a.metric(&limit.metric), b.metric(&limit.metric)) {
                let delta = (y - x).abs();
                if delta > limit.max_delta {
                    violations.push(GradientViolation {
                        from_id: a.id.clone(),
                        to_id: b.id.clone(),
                        metric: limit.metric.clone(),
                        distance_m,
                        delta,
                    });
                }
            }
        }
    }
    violations
}
