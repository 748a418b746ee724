//! Audit configuration: scoring thresholds, interpolation settings and the
//! collector registry.
//!
//! Every threshold the integrity scorer applies lives in [`ScoringThresholds`]
//! so the rules can be audited and tested in isolation. All sections are
//! optional in the TOML file; anything left out takes the default below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::collectors::{CollectorRegistry, is_valid_color};
use crate::logging::{self, Component};
use crate::model::{METRIC_CHLORINE, METRIC_CONDUCTIVITY, METRIC_PH, METRIC_TURBIDITY};

/// Environment variable naming the TOML config file.
pub const CONFIG_PATH_ENV: &str = "WQ_AUDIT_CONFIG";

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Maximum allowed change of one metric between nearby consecutive samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricJumpLimit {
    pub metric: String,
    pub max_delta: f64,
}

/// Short-range gradient plausibility rule.
///
/// Consecutive samples from the same collector that are closer than
/// `max_distance_m` (but further apart than `min_distance_m`) should not
/// differ by more than the configured per-metric limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientRule {
    pub enabled: bool,
    pub max_distance_m: f64,
    pub min_distance_m: f64,
    pub penalty: f64,
    pub limits: Vec<MetricJumpLimit>,
}

impl Default for GradientRule {
    fn default() -> Self {
        Self {
            enabled: false,
            max_distance_m: 300.0,
            min_distance_m: 1.0,
            penalty: 12.0,
            limits: vec![
                MetricJumpLimit {
                    metric: METRIC_CHLORINE.to_string(),
                    max_delta: 0.8,
                },
                MetricJumpLimit {
                    metric: METRIC_PH.to_string(),
                    max_delta: 1.2,
                },
            ],
        }
    }
}

/// Thresholds and penalty weights consumed by the integrity scorer.
///
/// Sample floors are exclusive: a rule applies when the collector has
/// *more than* the floor number of values for the metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringThresholds {
    /// Collector σ / population σ below this is "suppressed variance".
    pub variance_ratio_min: f64,
    pub variance_sample_floor: usize,
    pub variance_penalty: f64,

    /// |collector mean − population mean| / population mean above this.
    pub mean_deviation_max: f64,
    pub mean_sample_floor: usize,
    pub mean_penalty: f64,

    pub normality_penalty: f64,
    /// Chi-square(2) critical value at 5% significance.
    pub jarque_bera_critical: f64,

    /// Σ|actual% − expected%| over digits 1–9 above this.
    pub benford_deviation_max: f64,
    pub benford_sample_floor: usize,
    pub benford_penalty: f64,
    /// Metrics prone to high-precision manual entry.
    pub benford_metrics: Vec<String>,

    pub max_speed_kmh: f64,
    pub speed_penalty: f64,

    pub gradient: GradientRule,
}

impl Default for ScoringThresholds {
    fn default() -> Self {
        Self {
            variance_ratio_min: 0.25,
            variance_sample_floor: 4,
            variance_penalty: 20.0,
            mean_deviation_max: 0.4,
            mean_sample_floor: 5,
            mean_penalty: 15.0,
            normality_penalty: 10.0,
            jarque_bera_critical: 5.99,
            benford_deviation_max: 50.0,
            benford_sample_floor: 8,
            benford_penalty: 15.0,
            benford_metrics: vec![
                METRIC_CONDUCTIVITY.to_string(),
                METRIC_TURBIDITY.to_string(),
            ],
            max_speed_kmh: 130.0,
            speed_penalty: 20.0,
            gradient: GradientRule::default(),
        }
    }
}

impl ScoringThresholds {
    /// Same thresholds with the short-range gradient rule switched on.
    pub fn with_gradient_checks(mut self) -> Self {
        self.gradient.enabled = true;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("variance_ratio_min", self.variance_ratio_min),
            ("mean_deviation_max", self.mean_deviation_max),
            ("jarque_bera_critical", self.jarque_bera_critical),
            ("benford_deviation_max", self.benford_deviation_max),
            ("max_speed_kmh", self.max_speed_kmh),
            ("gradient.max_distance_m", self.gradient.max_distance_m),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidThreshold(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        let penalties = [
            ("variance_penalty", self.variance_penalty),
            ("mean_penalty", self.mean_penalty),
            ("normality_penalty", self.normality_penalty),
            ("benford_penalty", self.benford_penalty),
            ("speed_penalty", self.speed_penalty),
            ("gradient.penalty", self.gradient.penalty),
            ("gradient.min_distance_m", self.gradient.min_distance_m),
        ];
        for (name, value) in penalties {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidThreshold(format!(
                    "{} must be zero or positive, got {}",
                    name, value
                )));
            }
        }

        if self.gradient.min_distance_m >= self.gradient.max_distance_m {
            return Err(ConfigError::InvalidThreshold(
                "gradient.min_distance_m must be below gradient.max_distance_m".to_string(),
            ));
        }
        for limit in &self.gradient.limits {
            if !limit.max_delta.is_finite() || limit.max_delta <= 0.0 {
                return Err(ConfigError::InvalidThreshold(format!(
                    "gradient limit for '{}' must be positive, got {}",
                    limit.metric, limit.max_delta
                )));
            }
        }
        Ok(())
    }
}

/// Settings for the IDW overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolationConfig {
    pub power: f64,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self { power: 2.0 }
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub thresholds: ScoringThresholds,
    pub interpolation: InterpolationConfig,
    pub collectors: CollectorRegistry,
}

impl AuditConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: AuditConfig =
            toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))
            .and_then(|text| Self::from_toml_str(&text))
            .inspect_err(|e| {
                logging::error(Component::Config, None, &format!("{}: {}", path.display(), e));
            })?;
        logging::info(
            Component::Config,
            None,
            &format!(
                "Loaded {} collector(s) from {}",
                config.collectors.len(),
                path.display()
            ),
        );
        Ok(config)
    }

    /// Loads `.env` if present, then reads the file named by
    /// `WQ_AUDIT_CONFIG`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let path = std::env::var(CONFIG_PATH_ENV).map_err(|_| ConfigError::MissingPath)?;
        Self::load(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(id) = self.collectors.duplicate_id() {
            return Err(ConfigError::DuplicateCollector(id.to_string()));
        }
        if let Some(c) = self.collectors.iter().find(|c| !is_valid_color(&c.color)) {
            return Err(ConfigError::InvalidColor {
                id: c.id.clone(),
                color: c.color.clone(),
            });
        }
        if !self.interpolation.power.is_finite() || self.interpolation.power <= 0.0 {
            return Err(ConfigError::InvalidThreshold(format!(
                "interpolation.power must be a positive number, got {}",
                self.interpolation.power
            )));
        }
        self.thresholds.validate()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when loading the audit configuration.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// The config file could not be read.
    Io(String),
    /// The file is not valid TOML or does not match the schema.
    Parse(String),
    /// `WQ_AUDIT_CONFIG` is not set.
    MissingPath,
    DuplicateCollector(String),
    InvalidColor { id: String, color: String },
    InvalidThreshold(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "Config read error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Config parse error: {}", msg),
            ConfigError::MissingPath => write!(f, "{} is not set", CONFIG_PATH_ENV),
            ConfigError::DuplicateCollector(id) => write!(f, "Duplicate collector id: {}", id),
            ConfigError::InvalidColor { id, color } => {
                write!(f, "Invalid color for collector {}: {}", id, color)
            }
            ConfigError::InvalidThreshold(msg) => write!(f, "Invalid threshold: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
