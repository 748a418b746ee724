//! Spatial helpers: great-circle distance for movement checks and inverse
//! distance weighting for map overlays.
//!
//! Note the two deliberately different distance models. `geodesy` is true
//! haversine distance in meters; `idw` treats latitude/longitude as flat
//! Cartesian degrees, which is adequate at city scale.

pub mod geodesy;
pub mod idw;
