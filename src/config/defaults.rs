//! System-wide default constants.
//!
//! Grouped by subsystem for easy discovery. Every value here can be
//! overridden from `aquaguard.toml` unless noted otherwise.

// ============================================================================
// Simulation Clock
// ============================================================================

/// Default tick interval (ms).
pub const DEFAULT_INTERVAL_MS: u64 = 1_000;

/// Smallest interval accepted by the control surface (ms).
pub const MIN_INTERVAL_MS: u64 = 100;

/// Largest interval accepted by the control surface (ms).
pub const MAX_INTERVAL_MS: u64 = 5_000;

/// Emit a progress log line every N ticks.
pub const PROGRESS_LOG_EVERY_TICKS: u64 = 10;

// ============================================================================
// History / Status Bounds
// ============================================================================

/// Readings retained per metric series.
pub const HISTORY_WINDOW: usize = 10;

/// Alerts retained in the system status.
pub const MAX_ALERTS: usize = 5;

/// Recommendations retained in the system status.
pub const MAX_RECOMMENDATIONS: usize = 5;

// ============================================================================
// Threshold Evaluator
// ============================================================================

/// Leak probability above which an alert and recommendation are raised.
pub const LEAK_PROBABILITY_THRESHOLD: f64 = 0.02;

// ============================================================================
// Reading Generator
// ============================================================================

/// Flow baseline (L/min) and full noise width.
pub const FLOW_BASELINE: f64 = 100.0;
pub const FLOW_NOISE_WIDTH: f64 = 20.0;
pub const FLOW_UNIT: &str = "L/min";

/// Pressure baseline (PSI) and full noise width.
pub const PRESSURE_BASELINE: f64 = 50.0;
pub const PRESSURE_NOISE_WIDTH: f64 = 5.0;
pub const PRESSURE_UNIT: &str = "PSI";

/// Temperature baseline (°C) and full noise width.
pub const TEMPERATURE_BASELINE: f64 = 20.0;
pub const TEMPERATURE_NOISE_WIDTH: f64 = 2.0;
pub const TEMPERATURE_UNIT: &str = "°C";

/// Leak probability baseline (fraction) and full noise width.
///
/// The unit string is "%" even though the value is a fraction; the
/// alert message multiplies by 100 for display.
pub const LEAK_PROBABILITY_BASELINE: f64 = 0.01;
pub const LEAK_PROBABILITY_NOISE_WIDTH: f64 = 0.005;
pub const LEAK_PROBABILITY_UNIT: &str = "%";

// ============================================================================
// Server / Config Discovery
// ============================================================================

/// Default HTTP bind address.
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:8080";

/// Environment variable pointing at a TOML config file.
pub const CONFIG_ENV_VAR: &str = "AQUAGUARD_CONFIG";

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "aquaguard.toml";
