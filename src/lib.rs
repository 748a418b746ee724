//! Statistical audit of field-collected water-quality samples.
//!
//! Given an in-memory snapshot of samples, the engine computes descriptive
//! statistics, digit-pattern (Benford) analysis, metric correlations and IDW
//! estimates, and ranks collectors by how plausible their submissions look.
//! Every result is recomputed from the snapshot on each call.

pub mod analysis;
pub mod collectors;
pub mod config;
pub mod ingest;
pub mod integrity;
pub mod logging;
pub mod model;
pub mod report;
pub mod spatial;
