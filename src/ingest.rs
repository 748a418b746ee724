//! Sample snapshot ingestion
//!
//! Converts the JSON export produced by the data-entry layer into the
//! in-memory `Sample` records the audit engine reads. The export is an
//! array of flat records with epoch-millisecond timestamps and a metrics
//! object whose values may be `null`.

use std::collections::BTreeMap;

use chrono::DateTime;
use serde::Deserialize;

use crate::logging::{self, Component};
use crate::model::{IngestError, Location, Sample};

// ============================================================================
// Export Record Structures
// ============================================================================

/// One record as written by the data-entry layer.
#[derive(Debug, Deserialize)]
pub struct ExportRecord {
    pub id: String,
    #[serde(rename = "sampler")]
    pub collector_id: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
    #[serde(rename = "accuracy", default)]
    pub accuracy_m: f64,
    pub address: Option<String>,
    #[serde(default)]
    pub metrics: BTreeMap<String, Option<f64>>,
    pub notes: Option<String>,
}

impl TryFrom<ExportRecord> for Sample {
    type Error = IngestError;

    fn try_from(record: ExportRecord) -> Result<Self, Self::Error> {
        let timestamp = DateTime::from_timestamp_millis(record.timestamp).ok_or_else(|| {
            IngestError::InvalidTimestamp {
                id: record.id.clone(),
                millis: record.timestamp,
            }
        })?;

        Ok(Sample {
            id: record.id,
            collector_id: record.collector_id,
            timestamp,
            location: Location {
                latitude: record.latitude,
                longitude: record.longitude,
                accuracy_m: record.accuracy_m,
                address: record.address.filter(|a| !a.trim().is_empty()),
            },
            metrics: record.metrics,
            notes: record.notes.filter(|n| !n.trim().is_empty()),
        })
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parses a JSON export into samples, preserving record order.
pub fn parse_samples_json(text: &str) -> Result<Vec<Sample>, IngestError> {
    let records: Vec<ExportRecord> =
        serde_json::from_str(text).map_err(|e| IngestError::ParseError(e.to_string()))?;

    let samples = records
        .into_iter()
        .map(Sample::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    logging::info(
        Component::Ingest,
        None,
        &format!("Parsed {} sample(s) from export", samples.len()),
    );
    Ok(samples)
}

// ============================================================================
// Tests
// ============================================================================
