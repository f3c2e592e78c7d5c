//! Simulation controller: the user-facing control surface over the clock.
//!
//! Holds the selected area and owns the clock that drives the engine.

use std::sync::Arc;

use tracing::info;

use crate::clock::{ClockState, Scheduler, SimulationClock, TokioScheduler};
use crate::engine::EngineHandle;
use crate::types::{clamp_interval_ms, AreaId, SimulationConfig};

pub struct SimulationController<S: Scheduler = TokioScheduler> {
    clock: SimulationClock<S>,
    area: AreaId,
    engine: EngineHandle,
}

impl<S: Scheduler> SimulationController<S> {
    pub fn new(scheduler: S, engine: EngineHandle, config: SimulationConfig) -> Self {
        let clock = SimulationClock::new(
            scheduler,
            Arc::new(engine.clone()),
            clamp_interval_ms(config.interval_ms),
        );
        let mut controller = Self {
            clock,
            area: config.area,
            engine,
        };
        if config.running {
            controller.start();
        }
        controller
    }

    pub fn start(&mut self) -> bool {
        let interval_ms = self.clock.interval_ms();
        self.clock.start(interval_ms)
    }

    pub fn stop(&mut self) -> bool {
        self.clock.stop()
    }

    /// Flip between running and stopped. Returns the new running flag.
    pub fn toggle_running(&mut self) -> bool {
        if self.clock.is_running() {
            self.stop();
        } else {
            self.start();
        }
        self.clock.is_running()
    }

    /// Select a service area. Generation is not area-specific.
    pub fn set_area(&mut self, area: AreaId) {
        if area != self.area {
            info!(from = %self.area, to = %area, "Service area changed");
        }
        self.area = area;
    }

    /// Clamp and apply a new tick interval. Returns the interval in effect.
    pub fn set_interval(&mut self, interval_ms: u64) -> u64 {
        let clamped = clamp_interval_ms(interval_ms);
        if clamped != self.clock.interval_ms() {
            self.clock.change_interval(clamped);
        }
        clamped
    }

    pub fn config(&self) -> SimulationConfig {
        SimulationConfig {
            interval_ms: self.clock.interval_ms(),
            area: self.area,
            running: self.clock.is_running(),
        }
    }

    pub fn state(&self) -> ClockState {
        self.clock.state()
    }

    pub fn engine(&self) -> &EngineHandle {
        &self.engine
    }

    /// Stop the clock for process exit.
    pub fn shutdown(&mut self) {
        if self.clock.stop() {
            let stats = self.engine.stats();
            info!(ticks = stats.ticks, breaches = stats.breaches, "Simulation shut down");
        }
    }
}
