//! Derived status types: AlertKind, Alert, Priority, Recommendation, SystemStatus

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Alerts
// ============================================================================

/// Alert severity as rendered by the dashboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Info,
    Warning,
    Danger,
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertKind::Info => write!(f, "info"),
            AlertKind::Warning => write!(f, "warning"),
            AlertKind::Danger => write!(f, "danger"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Unique id (monotonic, see [`crate::engine::IdSequence`])
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Recommendations
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// System Status
// ============================================================================

/// Overall network health plus the bounded alert/recommendation lists.
///
/// Owned by the status aggregator; readers only ever see published copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub is_healthy: bool,
    pub alerts: Vec<Alert>,
    pub recommendations: Vec<Recommendation>,
}

impl Default for SystemStatus {
    fn default() -> Self {
        Self {
            is_healthy: true,
            alerts: Vec::new(),
            recommendations: Vec::new(),
        }
    }
}

impl SystemStatus {
    /// Healthy status pre-populated with three demo alerts and recommendations
    /// so an idle dashboard has something to show.
    pub fn with_sample_entries(now: DateTime<Utc>) -> Self {
        let alert = |id: &str, kind, message: &str| Alert {
            id: format!("sample-{id}"),
            kind,
            message: message.to_string(),
            timestamp: now,
        };
        let recommendation = |id: &str, title: &str, description: &str, priority| Recommendation {
            id: format!("sample-{id}"),
            title: title.to_string(),
            description: description.to_string(),
            priority,
            timestamp: now,
        };

        Self {
            is_healthy: true,
            alerts: vec![
                alert("1", AlertKind::Warning, "High water pressure detected. Inspect the system."),
                alert("2", AlertKind::Info, "Sensor calibration completed successfully."),
                alert(
                    "3",
                    AlertKind::Warning,
                    "Leak probability above threshold. Investigate leak source.",
                ),
            ],
            recommendations: vec![
                recommendation(
                    "1",
                    "Inspect System for Clogging",
                    "Check pipes for obstructions to ensure optimal flow.",
                    Priority::High,
                ),
                recommendation(
                    "2",
                    "Verify Sensor Calibration",
                    "Perform sensor calibration for accurate readings.",
                    Priority::Medium,
                ),
                recommendation(
                    "3",
                    "Regular Maintenance Check",
                    "Schedule periodic maintenance for system longevity.",
                    Priority::Low,
                ),
            ],
        }
    }
}
