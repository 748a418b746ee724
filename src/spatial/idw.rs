//! Inverse distance weighted estimates of a metric at arbitrary points.
//!
//! Each estimate is an independent O(n) pass over the snapshot with no
//! shared state, so raster cells can be computed in any order or in
//! parallel by the caller.

use serde::Serialize;

use crate::model::Sample;

/// Default IDW exponent.
pub const DEFAULT_POWER: f64 = 2.0;

/// Squared planar distance (degrees²) below which the query is treated as
/// sitting exactly on a sample.
pub const COINCIDENT_EPSILON: f64 = 1e-12;

/// IDW estimate of `metric` at (`latitude`, `longitude`).
///
/// Distance is planar in degrees. A sample at the query point short-circuits
/// to its own value. Returns `None` when no sample has a present value or
/// the total weight is zero.
pub fn idw_estimate(
    latitude: f64,
    longitude: f64,
    samples: &[Sample],
    metric: &str,
    power: f64,
) -> Option<f64> {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    for sample in samples {
        let Some(value) = sample.metric(metric) else {
            continue;
        };
        let d_lat = latitude - sample.location.latitude;
        let d_lon = longitude - sample.location.longitude;
        let dist_sq = d_lat * d_lat + d_lon * d_lon;

        if dist_sq < COINCIDENT_EPSILON {
            return Some(value);
        }

        // distance^power == (distance²)^(power / 2)
        let weight = 1.0 / dist_sq.powf(power / 2.0);
        weighted_sum += weight * value;
        total_weight += weight;
    }

    if total_weight > 0.0 && total_weight.is_finite() {
        Some(weighted_sum / total_weight)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Raster overlay
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

/// Extent of the samples that carry a value for `metric`.
pub fn bounding_box(samples: &[Sample], metric: &str) -> Option<BoundingBox> {
    samples
        .iter()
        .filter(|s| s.metric(metric).is_some())
        .fold(None, |acc: Option<BoundingBox>, s| {
            let (lat, lon) = (s.location.latitude, s.location.longitude);
            Some(match acc {
                None => BoundingBox {
                    south: lat,
                    west: lon,
                    north: lat,
                    east: lon,
                },
                Some(b) => BoundingBox {
                    south: b.south.min(lat),
                    west: b.west.min(lon),
                    north: b.north.max(lat),
                    east: b.east.max(lon),
                },
            })
        })
}

/// Raster layout for an overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    pub bounds: BoundingBox,
    pub rows: usize,
    pub cols: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridCell {
    /// Cell-center latitude.
    pub latitude: f64,
    /// Cell-center longitude.
    pub longitude: f64,
    pub value: Option<f64>,
}

/// Estimates `metric` at every cell center, row-major from the south-west
/// corner. Empty when the grid has no rows or columns.
pub fn interpolate_grid(spec: &GridSpec, samples: &[Sample], metric: &str, power: f64) -> Vec<GridCell> {
    if spec.rows == 0 || spec.cols == 0 {
        return Vec::new();
    }
    let cell_h = (spec.bounds.north - spec.bounds.south) / spec.rows as f64;
    let cell_w = (spec.bounds.east - spec.bounds.west) / spec.cols as f64;

    let mut cells = Vec::with_capacity(spec.rows * spec.cols);
    for row in 0..spec.rows {
        let latitude = spec.bounds.south + (row as f64 + 0.5) * cell_h;
        for col in 0..spec.cols {
            let longitude = spec.bounds.west + (col as f64 + 0.5) * cell_w;
            cells.push(GridCell {
                latitude,
                longitude,
                value: idw_estimate(latitude, longitude, samples, metric, power),
            });
        }
    }
    cells
}
