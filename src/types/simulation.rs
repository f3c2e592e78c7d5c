//! Simulation control types: AreaId, SimulationConfig

use serde::{Deserialize, Serialize};

use crate::config::defaults::{DEFAULT_INTERVAL_MS, MAX_INTERVAL_MS, MIN_INTERVAL_MS};

// ============================================================================
// Service Area
// ============================================================================

/// Service zone selected in the dashboard.
///
/// Currently presentational only: readings are generated identically for
/// every area.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AreaId {
    #[default]
    Residential,
    Commercial,
    Industrial,
    Recreational,
    Agricultural,
    Educational,
}

impl AreaId {
    pub const ALL: [AreaId; 6] = [
        AreaId::Residential,
        AreaId::Commercial,
        AreaId::Industrial,
        AreaId::Recreational,
        AreaId::Agricultural,
        AreaId::Educational,
    ];

    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            AreaId::Residential => "Residential Area",
            AreaId::Commercial => "Commercial District",
            AreaId::Industrial => "Industrial Zone",
            AreaId::Recreational => "Recreational Zone",
            AreaId::Agricultural => "Agricultural Zone",
            AreaId::Educational => "Educational Zone",
        }
    }

    /// Stable lowercase id used in config and the API
    pub fn id(&self) -> &'static str {
        match self {
            AreaId::Residential => "residential",
            AreaId::Commercial => "commercial",
            AreaId::Industrial => "industrial",
            AreaId::Recreational => "recreational",
            AreaId::Agricultural => "agricultural",
            AreaId::Educational => "educational",
        }
    }

    /// Parse from string (for API/config/CLI), case-insensitive
    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|a| a.id() == wanted)
    }
}

impl std::fmt::Display for AreaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Simulation Config
// ============================================================================

/// User-controlled simulation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub interval_ms: u64,
    pub area: AreaId,
    pub running: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            area: AreaId::default(),
            running: false,
        }
    }
}

/// Clamp a requested interval to the range the control surface accepts
pub fn clamp_interval_ms(ms: u64) -> u64 {
    ms.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS)
}
