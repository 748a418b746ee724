//! Statistical forensics over sample snapshots.
//!
//! Every function here is a pure recomputation over the values it is given;
//! nothing is cached between calls.
//!
//! Submodules:
//! - `statistics`: descriptive statistics and the Jarque–Bera normality test.
//! - `quantile`: inverse normal CDF and Q-Q pairs.
//! - `digits`: Benford first-digit and last-digit preference analysis.
//! - `correlation`: Pearson correlation, matrices and collector profiles.

pub mod correlation;
pub mod digits;
pub mod quantile;
pub mod statistics;
