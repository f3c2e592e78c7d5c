//! Telemetry types: Metric, Reading, MetricSeries, ReadingSet, SensorSnapshot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Metric
// ============================================================================

/// The four simulated water-network metrics
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Water flow (L/min)
    Flow,
    /// Line pressure (PSI)
    Pressure,
    /// Water temperature (°C)
    Temperature,
    /// Estimated leak probability (fraction, displayed as %)
    LeakProbability,
}

impl Metric {
    /// All metrics in dashboard order
    pub const ALL: [Metric; 4] = [
        Metric::Flow,
        Metric::Pressure,
        Metric::Temperature,
        Metric::LeakProbability,
    ];

    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            Metric::Flow => "Water Flow",
            Metric::Pressure => "Pressure",
            Metric::Temperature => "Temperature",
            Metric::LeakProbability => "Leak Probability",
        }
    }

    /// Short key used in JSON and logs
    pub fn key(&self) -> &'static str {
        match self {
            Metric::Flow => "flow",
            Metric::Pressure => "pressure",
            Metric::Temperature => "temperature",
            Metric::LeakProbability => "leak_probability",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Reading
// ============================================================================

/// One timestamped scalar measurement. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub unit: String,
}

impl Reading {
    pub fn new(timestamp: DateTime<Utc>, value: f64, unit: impl Into<String>) -> Self {
        Self {
            timestamp,
            value,
            unit: unit.into(),
        }
    }

    /// Value formatted to 2 decimal places with its unit, e.g. `"101.25 L/min"`
    pub fn formatted(&self) -> String {
        format!("{:.2} {}", self.value, self.unit)
    }
}

// ============================================================================
// Metric Series
// ============================================================================

/// Ordered readings for one metric, oldest first.
///
/// The length bound is enforced by [`crate::engine::history::append`]; a
/// series is never trimmed in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricSeries {
    readings: Vec<Reading>,
}

impl MetricSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_vec(readings: Vec<Reading>) -> Self {
        Self { readings }
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Newest reading
    pub fn latest(&self) -> Option<&Reading> {
        self.readings.last()
    }

    /// Reading before the newest, used for card trends
    pub fn previous(&self) -> Option<&Reading> {
        self.readings.iter().rev().nth(1)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reading> {
        self.readings.iter()
    }

    pub fn as_slice(&self) -> &[Reading] {
        &self.readings
    }

    pub fn values(&self) -> Vec<f64> {
        self.readings.iter().map(|r| r.value).collect()
    }
}

impl<'a> IntoIterator for &'a MetricSeries {
    type Item = &'a Reading;
    type IntoIter = std::slice::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.iter()
    }
}

// ============================================================================
// Reading Set (one tick of generator output)
// ============================================================================

/// One reading per metric, produced by a single generator call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingSet {
    pub flow: Reading,
    pub pressure: Reading,
    pub temperature: Reading,
    pub leak_probability: Reading,
}

impl ReadingSet {
    pub fn get(&self, metric: Metric) -> &Reading {
        match metric {
            Metric::Flow => &self.flow,
            Metric::Pressure => &self.pressure,
            Metric::Temperature => &self.temperature,
            Metric::LeakProbability => &self.leak_probability,
        }
    }
}

// ============================================================================
// Sensor Snapshot
// ============================================================================

/// Complete per-metric history at a given tick.
///
/// Published behind an `Arc` and replaced wholesale on every tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    pub flow: MetricSeries,
    pub pressure: MetricSeries,
    pub temperature: MetricSeries,
    pub leak_probability: MetricSeries,
}

impl SensorSnapshot {
    pub fn series(&self, metric: Metric) -> &MetricSeries {
        match metric {
            Metric::Flow => &self.flow,
            Metric::Pressure => &self.pressure,
            Metric::Temperature => &self.temperature,
            Metric::LeakProbability => &self.leak_probability,
        }
    }

    /// True before the first reading arrives (dashboard "loading" state)
    pub fn is_empty(&self) -> bool {
        Metric::ALL.iter().all(|m| self.series(*m).is_empty())
    }
}
