//! Simulation Clock
//!
//! Drives the engine at a configurable period. States are `Stopped` and
//! `Running`; at most one timer is armed at any time.
//!
//! Every arm bumps a generation counter and the armed callback captures the
//! value it was armed with. A callback whose generation no longer matches
//! (because the clock was stopped, re-armed or dropped in the meantime) is
//! discarded, so a late timer fire can never produce an extra tick.
//!
//! The callback checks the generation and runs the tick while holding the
//! generation lock, and disarming bumps it under the same lock. Once `stop`
//! returns, no tick is in flight and none will start.

mod scheduler;

pub use scheduler::{RepeatingTask, Scheduler, TimerHandle, TokioScheduler};

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

/// Receiver of clock ticks
pub trait TickHandler: Send + Sync + 'static {
    fn on_tick(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockState {
    Stopped,
    Running,
}

impl std::fmt::Display for ClockState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClockState::Stopped => write!(f, "Stopped"),
            ClockState::Running => write!(f, "Running"),
        }
    }
}

pub struct SimulationClock<S: Scheduler = TokioScheduler> {
    scheduler: S,
    handler: Arc<dyn TickHandler>,
    interval: Duration,
    generation: Arc<Mutex<u64>>,
    active: Option<TimerHandle>,
}

impl<S: Scheduler> SimulationClock<S> {
    pub fn new(scheduler: S, handler: Arc<dyn TickHandler>, interval_ms: u64) -> Self {
        Self {
            scheduler,
            handler,
            interval: period(interval_ms),
            generation: Arc::new(Mutex::new(0)),
            active: None,
        }
    }

    /// Arm the timer at `interval_ms`. Returns `false` and changes nothing if
    /// the clock is already running.
    pub fn start(&mut self, interval_ms: u64) -> bool {
        if self.is_running() {
            debug!(interval_ms = self.interval_ms(), "Clock already running, start ignored");
            return false;
        }
        self.interval = period(interval_ms);
        self.arm();
        info!(interval_ms = self.interval_ms(), "▶ Simulation clock started");
        true
    }

    /// Disarm the timer. Returns `false` if it was not running.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.disarm();
        info!("⏸ Simulation clock stopped");
        true
    }

    /// Set a new period. A running clock is re-armed so the next tick lands
    /// one new period from now; a stopped clock just remembers it.
    pub fn change_interval(&mut self, interval_ms: u64) {
        let was_running = self.is_running();
        if was_running {
            self.disarm();
        }
        self.interval = period(interval_ms);
        if was_running {
            self.arm();
        }
        info!(
            interval_ms = self.interval_ms(),
            running = was_running,
            "Simulation interval changed"
        );
    }

    pub fn state(&self) -> ClockState {
        if self.is_running() {
            ClockState::Running
        } else {
            ClockState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval.as_millis() as u64
    }

    fn arm(&mut self) {
        let armed_with = {
            let mut current = lock_generation(&self.generation);
            *current += 1;
            *current
        };
        let generation = Arc::clone(&self.generation);
        let handler = Arc::clone(&self.handler);

        let task: RepeatingTask = Box::new(move || {
            let current = lock_generation(&generation);
            if *current != armed_with {
                debug!(armed_with, "Discarding stale clock callback");
                return;
            }
            handler.on_tick();
        });

        self.active = Some(self.scheduler.schedule_repeating(self.interval, task));
    }

    fn disarm(&mut self) {
        *lock_generation(&self.generation) += 1;
        if let Some(timer) = self.active.take() {
            timer.cancel();
        }
    }
}

impl<S: Scheduler> Drop for SimulationClock<S> {
    fn drop(&mut self) {
        self.disarm();
    }
}

impl<S: Scheduler> std::fmt::Debug for SimulationClock<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationClock")
            .field("state", &self.state())
            .field("interval_ms", &self.interval_ms())
            .finish_non_exhaustive()
    }
}

fn lock_generation(generation: &Mutex<u64>) -> MutexGuard<'_, u64> {
    generation.lock().unwrap_or_else(|e| {
        warn!("Clock generation lock poisoned, recovering");
        e.into_inner()
    })
}

// Zero would make tokio's interval panic.
fn period(interval_ms: u64) -> Duration {
    Duration::from_millis(interval_ms.max(1))
}
