//! AquaGuard: simulated water-utility telemetry
//!
//! Generates noisy flow, pressure, temperature and leak-probability readings
//! on a fixed cadence, keeps a short bounded history per metric, and raises
//! alerts with inspection recommendations when the leak probability crosses
//! its threshold.
//!
//! ## Architecture
//!
//! - **Engine**: generator, history buffer, threshold evaluator and status
//!   aggregator run as one pipeline per tick
//! - **Clock**: cancellable repeating timer with a stale-callback guard
//! - **Control**: start/stop, area and interval settings
//! - **Presentation**: render-ready dashboard view model
//! - **API**: axum endpoints over the published engine state
//! - **Import**: offline CSV bulk import of readings

pub mod api;
pub mod clock;
pub mod config;
pub mod control;
pub mod engine;
pub mod import;
pub mod presentation;
pub mod types;

// Re-export configuration
pub use config::{AquaConfig, ConfigError};

// Re-export commonly used types
pub use types::{
    Alert, AlertKind, AreaId, Metric, MetricSeries, Priority, Reading, ReadingSet,
    Recommendation, SensorSnapshot, SimulationConfig, SystemStatus,
};

// Re-export engine and control surface
pub use clock::{ClockState, Scheduler, SimulationClock, TickHandler, TokioScheduler};
pub use control::SimulationController;
pub use engine::{EngineHandle, EngineStats, SimulationEngine, TickOutcome};
pub use import::{import_csv, ImportError, ImportReport};
pub use presentation::DashboardView;
