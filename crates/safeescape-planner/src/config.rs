//! Planner configuration and tunable scoring weights.
//!
//! Configuration can be loaded from a YAML file (see `planner.example.yaml`
//! at the workspace root). Every field is optional; missing fields take the
//! defaults below.
//!
//! The scoring constants have no empirical calibration behind them. They are
//! exposed here so operators can tune them without code changes.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Errors that can occur when loading planner configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The values parsed but are inconsistent.
    #[error("invalid planner config: {0}")]
    Invalid(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level planner configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Number of safe-zone candidates kept after ranking.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Deadline for the advisory service, in milliseconds.
    #[serde(default = "default_advisory_timeout_ms")]
    pub advisory_timeout_ms: u64,

    /// Deadline for each individual geo provider call, in milliseconds.
    #[serde(default = "default_geo_call_timeout_ms")]
    pub geo_call_timeout_ms: u64,

    /// Smallest search radius the geo provider supports.
    #[serde(default = "default_min_radius_meters")]
    pub min_radius_meters: u32,

    /// Largest search radius the geo provider supports.
    #[serde(default = "default_max_radius_meters")]
    pub max_radius_meters: u32,

    /// Route scoring weights.
    #[serde(default)]
    pub scoring: ScoringWeights,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            advisory_timeout_ms: default_advisory_timeout_ms(),
            geo_call_timeout_ms: default_geo_call_timeout_ms(),
            min_radius_meters: default_min_radius_meters(),
            max_radius_meters: default_max_radius_meters(),
            scoring: ScoringWeights::default(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if the values are inconsistent.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    /// Reject configurations the planner cannot run with.
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.max_results == 0 {
            return Err(ConfigError::Invalid("max_results must be at least 1".to_owned()));
        }
        if self.min_radius_meters > self.max_radius_meters {
            return Err(ConfigError::Invalid(format!(
                "min_radius_meters ({}) exceeds max_radius_meters ({})",
                self.min_radius_meters, self.max_radius_meters
            )));
        }
        if self.advisory_timeout_ms == 0 || self.geo_call_timeout_ms == 0 {
            return Err(ConfigError::Invalid("timeouts must be non-zero".to_owned()));
        }
        self.scoring.check()
    }

    /// Advisory deadline as a [`Duration`].
    pub const fn advisory_timeout(&self) -> Duration {
        Duration::from_millis(self.advisory_timeout_ms)
    }

    /// Per-call geo provider deadline as a [`Duration`].
    pub const fn geo_call_timeout(&self) -> Duration {
        Duration::from_millis(self.geo_call_timeout_ms)
    }

    /// Clamp a search radius to the provider's supported range.
    ///
    /// The upper bound wins if the bounds are inverted.
    pub fn clamp_radius(&self, radius_meters: u32) -> u32 {
        radius_meters
            .max(self.min_radius_meters)
            .min(self.max_radius_meters)
    }
}

/// Weights of the composite route score, clamped to `[0, 100]`:
///
/// ```text
/// score = base
///       - min(duration_cap, duration_s / seconds_per_point)
///       - min(distance_cap, distance_m / meters_per_point)
///       - min(step_cap, steps)
///       - warning_penalty * warnings
///       - hazard_penalty_scale * hazard_penalty
///       + destination_bonus_scale * destination_bonus
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Starting score before penalties.
    pub base_score: f64,
    /// Maximum penalty for travel time.
    pub duration_penalty_cap: f64,
    /// Seconds of travel per penalty point.
    pub seconds_per_duration_point: f64,
    /// Maximum penalty for route length.
    pub distance_penalty_cap: f64,
    /// Meters of route per penalty point.
    pub meters_per_distance_point: f64,
    /// Maximum penalty for navigation steps (one point per step).
    pub step_penalty_cap: f64,
    /// Flat penalty per provider warning, uncapped.
    pub warning_penalty: f64,
    /// Multiplier on the per-hazard keyword penalties.
    pub hazard_penalty_scale: f64,
    /// Multiplier on the per-hazard destination bonuses.
    pub destination_bonus_scale: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            base_score: 100.0,
            duration_penalty_cap: 40.0,
            seconds_per_duration_point: 60.0,
            distance_penalty_cap: 30.0,
            meters_per_distance_point: 1000.0,
            step_penalty_cap: 15.0,
            warning_penalty: 10.0,
            hazard_penalty_scale: 1.0,
            destination_bonus_scale: 1.0,
        }
    }
}

impl ScoringWeights {
    /// Reject divisors that are not positive and caps that are negative.
    fn check(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("seconds_per_duration_point", self.seconds_per_duration_point),
            ("meters_per_distance_point", self.meters_per_distance_point),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "scoring.{name} must be positive, got {value}"
                )));
            }
        }
        for (name, value) in [
            ("duration_penalty_cap", self.duration_penalty_cap),
            ("distance_penalty_cap", self.distance_penalty_cap),
            ("step_penalty_cap", self.step_penalty_cap),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "scoring.{name} must not be negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

const fn default_max_results() -> usize {
    3
}

const fn default_advisory_timeout_ms() -> u64 {
    5000
}

const fn default_geo_call_timeout_ms() -> u64 {
    8000
}

const fn default_min_radius_meters() -> u32 {
    1000
}

const fn default_max_radius_meters() -> u32 {
    50_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PlannerConfig::default();
        assert!(config.check().is_ok());
        assert_eq!(config.max_results, 3);
        assert_eq!(config.advisory_timeout(), Duration::from_secs(5));
        assert_eq!(config.clamp_radius(200), 1000);
        assert_eq!(config.clamp_radius(80_000), 50_000);
        assert_eq!(config.clamp_radius(15_000), 15_000);
    }

    #[test]
    fn parse_partial_yaml_keeps_defaults() {
        let yaml = r"
max_results: 5
advisory_timeout_ms: 2500
scoring:
  warning_penalty: 12.5
";
        let config = PlannerConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.unwrap_or_default();
        assert_eq!(config.max_results, 5);
        assert_eq!(config.advisory_timeout_ms, 2500);
        assert_eq!(config.geo_call_timeout_ms, 8000);
        assert!((config.scoring.warning_penalty - 12.5).abs() < f64::EPSILON);
        assert!((config.scoring.duration_penalty_cap - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_yaml_is_default() {
        let config = PlannerConfig::parse("{}");
        assert!(matches!(config, Ok(c) if c == PlannerConfig::default()));
    }

    #[test]
    fn example_file_matches_defaults() {
        let config = PlannerConfig::parse(include_str!("../../../planner.example.yaml"));
        assert!(matches!(config, Ok(c) if c == PlannerConfig::default()));
    }

    #[test]
    fn inconsistent_radius_rejected() {
        let yaml = "min_radius_meters: 9000\nmax_radius_meters: 100\n";
        assert!(matches!(
            PlannerConfig::parse(yaml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn zero_max_results_rejected() {
        assert!(matches!(
            PlannerConfig::parse("max_results: 0"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn non_positive_scoring_divisor_rejected() {
        for yaml in [
            "scoring:\n  seconds_per_duration_point: 0\n",
            "scoring:\n  meters_per_distance_point: -1000\n",
        ] {
            assert!(matches!(
                PlannerConfig::parse(yaml),
                Err(ConfigError::Invalid(msg)) if msg.contains("must be positive")
            ));
        }
    }

    #[test]
    fn negative_penalty_cap_rejected() {
        let yaml = "scoring:\n  step_penalty_cap: -5\n";
        assert!(matches!(
            PlannerConfig::parse(yaml),
            Err(ConfigError::Invalid(msg)) if msg.contains("step_penalty_cap")
        ));

        // A zero cap disables that penalty and is allowed.
        assert!(PlannerConfig::parse("scoring:\n  distance_penalty_cap: 0\n").is_ok());
    }

    #[test]
    fn invalid_yaml_rejected() {
        assert!(matches!(
            PlannerConfig::parse("max_results: [unclosed"),
            Err(ConfigError::Yaml { .. })
        ));
    }
}
