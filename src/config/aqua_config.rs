//! AquaGuard Configuration - simulation, generator profiles and thresholds as TOML values
//!
//! Each struct implements `Default` with the values in [`super::defaults`],
//! so an absent or empty config file reproduces the stock simulation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::defaults;
use crate::types::{AreaId, Metric};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for an AquaGuard deployment.
///
/// Load with `AquaConfig::load()` which searches:
/// 1. `$AQUAGUARD_CONFIG` env var
/// 2. `./aquaguard.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AquaConfig {
    /// Clock, window and status-list settings
    #[serde(default)]
    pub simulation: SimulationSettings,

    /// Per-metric generator baselines and noise
    #[serde(default)]
    pub metrics: MetricProfiles,

    /// Alerting thresholds
    #[serde(default)]
    pub thresholds: ThresholdConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

impl AquaConfig {
    /// Load configuration using the standard search order:
    /// 1. `$AQUAGUARD_CONFIG` environment variable
    /// 2. `./aquaguard.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        let env_path = std::env::var(defaults::CONFIG_ENV_VAR).ok();
        Self::load_from_candidates(env_path.as_deref(), Path::new(defaults::CONFIG_FILE_NAME))
    }

    /// Search order used by [`load`](Self::load), with the inputs made explicit.
    pub fn load_from_candidates(env_path: Option<&str>, local: &Path) -> Self {
        // 1. Explicit path
        if let Some(path) = env_path {
            let p = PathBuf::from(path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded config from {}", defaults::CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", defaults::CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", defaults::CONFIG_ENV_VAR);
            }
        }

        // 2. Working-directory file
        if local.exists() {
            match Self::load_from_file(local) {
                Ok(config) => {
                    info!(path = %local.display(), "Loaded config from working directory");
                    return config;
                }
                Err(e) => {
                    warn!(path = %local.display(), error = %e, "Failed to load local config, using defaults");
                }
            }
        }

        // 3. Defaults
        info!("No {} found, using built-in defaults", defaults::CONFIG_FILE_NAME);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Save config to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// Validate all settings, collecting every problem before returning.
    ///
    /// Rules:
    /// - Interval within the control-surface range
    /// - Window and list caps must be > 0
    /// - Baselines finite, noise widths finite and >= 0
    /// - Thresholds finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();
        let s = &self.simulation;

        if !(defaults::MIN_INTERVAL_MS..=defaults::MAX_INTERVAL_MS).contains(&s.interval_ms) {
            errors.push(format!(
                "simulation.interval_ms ({}) must be within [{}, {}]",
                s.interval_ms,
                defaults::MIN_INTERVAL_MS,
                defaults::MAX_INTERVAL_MS
            ));
        }
        if s.history_window == 0 {
            errors.push("simulation.history_window must be > 0".to_string());
        }
        if s.max_alerts == 0 {
            errors.push("simulation.max_alerts must be > 0".to_string());
        }
        if s.max_recommendations == 0 {
            errors.push("simulation.max_recommendations must be > 0".to_string());
        }

        for metric in Metric::ALL {
            let profile = self.metrics.profile(metric);
            let name = metric.key();
            if !profile.baseline.is_finite() {
                errors.push(format!("metrics.{name}.baseline must be finite (got {})", profile.baseline));
            }
            if !profile.noise_width.is_finite() || profile.noise_width < 0.0 {
                errors.push(format!(
                    "metrics.{name}.noise_width must be finite and >= 0 (got {})",
                    profile.noise_width
                ));
            }
        }

        if !self.thresholds.leak_probability.is_finite() {
            errors.push(format!(
                "thresholds.leak_probability must be finite (got {})",
                self.thresholds.leak_probability
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {1}", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config parse error ({}): {1}", .0.display())]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ============================================================================
// Simulation Settings
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimulationSettings {
    /// Tick interval in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Initially selected service area
    #[serde(default)]
    pub area: AreaId,

    /// Start the clock as soon as the service is up
    #[serde(default)]
    pub autostart: bool,

    /// Readings kept per metric
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    #[serde(default = "default_max_alerts")]
    pub max_alerts: usize,

    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,

    /// RNG seed for reproducible runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Seed every series with one reading before the first tick
    #[serde(default = "default_true")]
    pub prime_initial_reading: bool,

    /// Start with demo alerts/recommendations in the status lists
    #[serde(default)]
    pub sample_status: bool,
}

fn default_interval_ms() -> u64 {
    defaults::DEFAULT_INTERVAL_MS
}

fn default_history_window() -> usize {
    defaults::HISTORY_WINDOW
}

fn default_max_alerts() -> usize {
    defaults::MAX_ALERTS
}

fn default_max_recommendations() -> usize {
    defaults::MAX_RECOMMENDATIONS
}

fn default_true() -> bool {
    true
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            area: AreaId::default(),
            autostart: false,
            history_window: default_history_window(),
            max_alerts: default_max_alerts(),
            max_recommendations: default_max_recommendations(),
            seed: None,
            prime_initial_reading: true,
            sample_status: false,
        }
    }
}

// ============================================================================
// Generator Profiles
// ============================================================================

/// Baseline and full noise width for one metric.
///
/// Generated values fall in `[baseline - noise_width/2, baseline + noise_width/2)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricProfile {
    pub baseline: f64,
    pub noise_width: f64,
    pub unit: String,
}

impl MetricProfile {
    pub fn new(baseline: f64, noise_width: f64, unit: &str) -> Self {
        Self {
            baseline,
            noise_width,
            unit: unit.to_string(),
        }
    }

    /// Inclusive lower bound of generated values
    pub fn min(&self) -> f64 {
        self.baseline - self.noise_width / 2.0
    }

    /// Upper bound of generated values
    pub fn max(&self) -> f64 {
        self.baseline + self.noise_width / 2.0
    }
}

/// A metric table, when present, must list all three fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricProfiles {
    #[serde(default = "default_flow")]
    pub flow: MetricProfile,
    #[serde(default = "default_pressure")]
    pub pressure: MetricProfile,
    #[serde(default = "default_temperature")]
    pub temperature: MetricProfile,
    #[serde(default = "default_leak_probability")]
    pub leak_probability: MetricProfile,
}

fn default_flow() -> MetricProfile {
    MetricProfile::new(defaults::FLOW_BASELINE, defaults::FLOW_NOISE_WIDTH, defaults::FLOW_UNIT)
}

fn default_pressure() -> MetricProfile {
    MetricProfile::new(
        defaults::PRESSURE_BASELINE,
        defaults::PRESSURE_NOISE_WIDTH,
        defaults::PRESSURE_UNIT,
    )
}

fn default_temperature() -> MetricProfile {
    MetricProfile::new(
        defaults::TEMPERATURE_BASELINE,
        defaults::TEMPERATURE_NOISE_WIDTH,
        defaults::TEMPERATURE_UNIT,
    )
}

fn default_leak_probability() -> MetricProfile {
    MetricProfile::new(
        defaults::LEAK_PROBABILITY_BASELINE,
        defaults::LEAK_PROBABILITY_NOISE_WIDTH,
        defaults::LEAK_PROBABILITY_UNIT,
    )
}

impl Default for MetricProfiles {
    fn default() -> Self {
        Self {
            flow: default_flow(),
            pressure: default_pressure(),
            temperature: default_temperature(),
            leak_probability: default_leak_probability(),
        }
    }
}

impl MetricProfiles {
    pub fn profile(&self, metric: Metric) -> &MetricProfile {
        match metric {
            Metric::Flow => &self.flow,
            Metric::Pressure => &self.pressure,
            Metric::Temperature => &self.temperature,
            Metric::LeakProbability => &self.leak_probability,
        }
    }
}

// ============================================================================
// Thresholds
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThresholdConfig {
    /// Leak probability (fraction) above which a breach is raised
    #[serde(default = "default_leak_threshold")]
    pub leak_probability: f64,
}

fn default_leak_threshold() -> f64 {
    defaults::LEAK_PROBABILITY_THRESHOLD
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            leak_probability: default_leak_threshold(),
        }
    }
}

// ============================================================================
// Server
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// HTTP server bind address.
    ///
    /// Can be overridden by `AQUAGUARD_SERVER_ADDR` env var or `--addr` CLI flag.
    #[serde(default = "default_server_addr")]
    pub addr: String,
}

fn default_server_addr() -> String {
    defaults::DEFAULT_SERVER_ADDR.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
