//! Integrity Ranking Integration Tests
//!
//! Builds a three-collector snapshot with one fabricated-looking profile per
//! rule family and checks the full ranking:
//! - alpha: chlorine readings far more stable than the population
//! - bravo: two samples ~50 km apart five minutes apart
//! - charlie: ordinary, well-spread readings

use chrono::{DateTime, Duration, TimeZone, Utc};
use wq_audit::collectors::{Collector, CollectorRegistry};
use wq_audit::config::ScoringThresholds;
use wq_audit::integrity::rank_collectors;
use wq_audit::model::{
    Location, METRIC_CHLORINE, METRIC_CONDUCTIVITY, METRIC_PH, METRIC_TURBIDITY, Sample,
};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 8, 0, 0).unwrap()
}

fn sample(
    id: String,
    collector: &str,
    minutes: i64,
    lat: f64,
    lon: f64,
    metrics: &[(&str, f64)],
) -> Sample {
    Sample {
        id,
        collector_id: collector.to_string(),
        timestamp: start() + Duration::minutes(minutes),
        location: Location {
            latitude: lat,
            longitude: lon,
            accuracy_m: 5.0,
            address: None,
        },
        metrics: metrics
            .iter()
            .map(|(k, v)| (k.to_string(), Some(*v)))
            .collect(),
        notes: None,
    }
}

fn registry() -> CollectorRegistry {
    CollectorRegistry::new(vec![
        Collector {
            id: "alpha".to_string(),
            name: "Alpha crew".to_string(),
            color: "#1f77b4".to_string(),
        },
        Collector {
            id: "bravo".to_string(),
            name: "Bravo crew".to_string(),
            color: "#ff7f0e".to_string(),
        },
        Collector {
            id: "charlie".to_string(),
            name: "Charlie crew".to_string(),
            color: "#2ca02c".to_string(),
        },
    ])
}

fn snapshot() -> Vec<Sample> {
    let mut samples = Vec::new();

    for (i, v) in [1.00, 1.01, 1.00, 1.01, 1.00, 1.01].iter().enumerate() {
        samples.push(sample(
            format!("alpha-{}", i),
            "alpha",
            i as i64 * 60,
            40.70 + i as f64 * 0.01,
            -89.60,
            &[(METRIC_CHLORINE, *v)],
        ));
    }

    samples.push(sample(
        "bravo-0".to_string(),
        "bravo",
        0,
        40.00,
        -89.00,
        &[(METRIC_CHLORINE, 0.9), (METRIC_PH, 7.0)],
    ));
    samples.push(sample(
        "bravo-1".to_string(),
        "bravo",
        5,
        40.45,
        -89.00,
        &[(METRIC_CHLORINE, 1.1), (METRIC_PH, 7.2)],
    ));

    let chlorine = [0.6, 0.8, 0.9, 1.0, 1.0, 1.1, 1.2, 1.4];
    let ph = [6.6, 6.8, 7.0, 7.1, 7.1, 7.2, 7.4, 7.6];
    let ec = [420.0, 450.0, 470.0, 490.0, 500.0, 520.0, 540.0, 570.0];
    let turbidity = [1.2, 1.6, 1.9, 2.1, 2.3, 2.6, 2.9, 3.4];
    for i in 0..8 {
        samples.push(sample(
            format!("charlie-{}", i),
            "charlie",
            i as i64 * 90,
            40.60 + i as f64 * 0.02,
            -89.50,
            &[
                (METRIC_CHLORINE, chlorine[i]),
                (METRIC_PH, ph[i]),
                (METRIC_CONDUCTIVITY, ec[i]),
                (METRIC_TURBIDITY, turbidity[i]),
            ],
        ));
    }

    samples
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn test_unremarkable_collector_ranks_first() {
    let ranking = rank_collectors(&snapshot(), &registry(), &ScoringThresholds::default());
    let ids: Vec<_> = ranking.iter().map(|e| e.collector_id.as_str()).collect();
    assert_eq!(ids, vec!["charlie", "alpha", "bravo"]);

    let charlie = &ranking[0];
    assert!((charlie.score - 100.0).abs() < 1e-9, "charlie scored {}", charlie.score);
    assert!(charlie.flags.is_empty(), "charlie flags: {:?}", charlie.flags);
    assert_eq!(charlie.sample_count, 8);
}

#[test]
fn test_variance_suppression_penalty_applied() {
    let ranking = rank_collectors(&snapshot(), &registry(), &ScoringThresholds::default());
    let alpha = ranking.iter().find(|e| e.collector_id == "alpha").unwrap();

    let chlorine = alpha
        .metric_scores
        .iter()
        .find(|m| m.metric == METRIC_CHLORINE)
        .unwrap();
    assert_eq!(chlorine.integrity, 80.0, "flags: {:?}", chlorine.flags);
    assert!(chlorine.flags.iter().any(|f| f.contains("suppressed variance")));

    // Other metrics unrecorded: (80 + 100 + 100 + 100) / 4.
    assert!((alpha.score - 95.0).abs() < 1e-9, "alpha scored {}", alpha.score);
}

#[test]
fn test_illegal_speed_flag_and_penalty() {
    let ranking = rank_collectors(&snapshot(), &registry(), &ScoringThresholds::default());
    let bravo = ranking.iter().find(|e| e.collector_id == "bravo").unwrap();

    assert_eq!(bravo.flags.len(), 1, "flags: {:?}", bravo.flags);
    assert!(bravo.flags[0].starts_with("illegal travel speed"));
    assert!((bravo.score - 80.0).abs() < 1e-9, "bravo scored {}", bravo.score);
}

#[test]
fn test_ranking_is_pure_recomputation() {
    let samples = snapshot();
    let first = rank_collectors(&samples, &registry(), &ScoringThresholds::default());
    let second = rank_collectors(&samples, &registry(), &ScoringThresholds::default());
    assert_eq!(first, second);
}

#[test]
fn test_input_order_does_not_change_scores() {
    let mut reversed = snapshot();
    reversed.reverse();
    let a = rank_collectors(&snapshot(), &registry(), &ScoringThresholds::default());
    let b = rank_collectors(&reversed, &registry(), &ScoringThresholds::default());
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.collector_id, y.collector_id);
        assert!((x.score - y.score).abs() < 1e-9);
        assert_eq!(x.flags, y.flags);
    }
}

#[test]
fn test_looser_speed_limit_clears_bravo() {
    let thresholds = ScoringThresholds {
        max_speed_kmh: 1000.0,
        ..ScoringThresholds::default()
    };
    let ranking = rank_collectors(&snapshot(), &registry(), &thresholds);
    let bravo = ranking.iter().find(|e| e.collector_id == "bravo").unwrap();
    assert!(bravo.flags.is_empty());
    assert!((bravo.score - 100.0).abs() < 1e-9);
}

#[test]
fn test_gradient_variant_leaves_spread_out_collectors_alone() {
    // Consecutive charlie/alpha samples are >1 km apart, outside the 300 m band.
    let thresholds = ScoringThresholds::default().with_gradient_checks();
    let ranking = rank_collectors(&snapshot(), &registry(), &thresholds);
    let ids: Vec<_> = ranking.iter().map(|e| e.collector_id.as_str()).collect();
    assert_eq!(ids, vec!["charlie", "alpha", "bravo"]);
    assert!(ranking
        .iter()
        .flat_map(|e| &e.flags)
        .all(|f| !f.contains("short-range jump")));
}
