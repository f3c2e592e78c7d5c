//! Shared data structures for the water telemetry engine
//!
//! - Reading / MetricSeries / SensorSnapshot (generator + history buffer)
//! - Alert / Recommendation / SystemStatus (evaluator + aggregator)
//! - AreaId / SimulationConfig (control surface)

mod reading;
mod status;
mod simulation;

pub use reading::*;
pub use status::*;
pub use simulation::*;
