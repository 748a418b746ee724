//! Collector registry for the audit engine.
//!
//! Holds the field collectors whose submissions are ranked, along with the
//! display attributes the presentation layer uses for them. The registry is
//! injected (usually from `AuditConfig`) rather than baked into the scorer,
//! and its order is the enumeration order used to break ranking ties.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Collector metadata
// ---------------------------------------------------------------------------

/// Metadata for a single field collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collector {
    /// Identifier stamped on every sample this collector submits.
    pub id: String,
    /// Human-readable name shown in rankings and legends.
    pub name: String,
    /// Marker/legend color as `#rrggbb`.
    pub color: String,
}

/// Ordered set of collectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectorRegistry {
    collectors: Vec<Collector>,
}

impl CollectorRegistry {
    pub fn new(collectors: Vec<Collector>) -> Self {
        Self { collectors }
    }

    /// Builds a registry from bare identifiers, using the id as the name and
    /// a neutral grey as the color.
    pub fn from_ids(ids: &[&str]) -> Self {
        Self::new(
            ids.iter()
                .map(|id| Collector {
                    id: id.to_string(),
                    name: id.to_string(),
                    color: "#808080".to_string(),
                })
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &Collector> {
        self.collectors.iter()
    }

    pub fn len(&self) -> usize {
        self.collectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collectors.is_empty()
    }

    /// Identifiers in enumeration order.
    pub fn ids(&self) -> Vec<&str> {
        self.collectors.iter().map(|c| c.id.as_str()).collect()
    }

    /// Looks up a collector by id. Returns `None` if not registered.
    pub fn find(&self, id: &str) -> Option<&Collector> {
        self.collectors.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// First duplicated id, if any.
    pub fn duplicate_id(&self) -> Option<&str> {
        let mut seen = std::collections::HashSet::new();
        self.collectors
            .iter()
            .find(|c| !seen.insert(c.id.as_str()))
            .map(|c| c.id.as_str())
    }
}

/// Returns `true` for colors of the form `#rrggbb`.
pub fn is_valid_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
