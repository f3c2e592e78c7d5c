//! Telemetry Engine
//!
//! ## Per-Tick Pipeline
//!
//! ```text
//! STEP 1: Reading Generator   -> one ReadingSet
//! STEP 2: History Buffer      -> new SensorSnapshot (bounded per metric)
//! STEP 3: Threshold Evaluator -> Option<Breach> from newest leak reading
//! STEP 4: Status Aggregator   -> new SystemStatus (bounded lists)
//! STEP 5: Publish             -> readers see the new snapshot + status
//! ```
//!
//! [`SimulationEngine`] is the single writer and is owned explicitly by
//! whoever hosts the clock. [`EngineHandle`] wraps it for shared use and
//! publishes each tick's results copy-on-write through `ArcSwap`, so HTTP
//! readers never block the tick and never see a half-applied tick.

pub mod aggregator;
pub mod evaluator;
pub mod generator;
pub mod history;

pub use aggregator::StatusAggregator;
pub use evaluator::{Breach, IdSequence, ThresholdEvaluator};
pub use generator::ReadingGenerator;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use crate::clock::TickHandler;
use crate::config::defaults::PROGRESS_LOG_EVERY_TICKS;
use crate::config::AquaConfig;
use crate::types::{ReadingSet, SensorSnapshot, SystemStatus};

// ============================================================================
// Engine
// ============================================================================

/// Counters for logging and the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub ticks: u64,
    pub breaches: u64,
}

/// Result of one pipeline run
#[derive(Debug, Clone)]
pub struct TickOutcome {
    /// 1-based tick number
    pub tick: u64,
    pub breach: Option<Breach>,
    pub snapshot: Arc<SensorSnapshot>,
    pub status: Arc<SystemStatus>,
}

/// Owns the generator, history and status for one simulated network.
#[derive(Debug)]
pub struct SimulationEngine {
    generator: ReadingGenerator,
    evaluator: ThresholdEvaluator,
    aggregator: StatusAggregator,
    window: usize,
    snapshot: Arc<SensorSnapshot>,
    status: Arc<SystemStatus>,
    stats: EngineStats,
}

impl SimulationEngine {
    /// Build an engine from config, applying the seed, priming and sample
    /// status options.
    pub fn new(config: &AquaConfig) -> Self {
        let sim = &config.simulation;
        let generator = match sim.seed {
            Some(seed) => ReadingGenerator::with_seed(config.metrics.clone(), seed),
            None => ReadingGenerator::new(config.metrics.clone()),
        };
        let status = if sim.sample_status {
            SystemStatus::with_sample_entries(Utc::now())
        } else {
            SystemStatus::default()
        };

        let mut engine = Self::from_parts(
            generator,
            ThresholdEvaluator::new(config.thresholds.leak_probability),
            StatusAggregator::new(sim.max_alerts, sim.max_recommendations),
            sim.history_window,
            status,
        );
        if sim.prime_initial_reading {
            engine.prime();
        }
        engine
    }

    pub fn from_parts(
        generator: ReadingGenerator,
        evaluator: ThresholdEvaluator,
        aggregator: StatusAggregator,
        window: usize,
        status: SystemStatus,
    ) -> Self {
        Self {
            generator,
            evaluator,
            aggregator,
            window,
            snapshot: Arc::new(SensorSnapshot::default()),
            status: Arc::new(status),
            stats: EngineStats::default(),
        }
    }

    /// Add one reading to every series without evaluating thresholds or
    /// counting a tick. Used to show an initial sample before the clock runs.
    pub fn prime(&mut self) {
        let set = self.generator.generate();
        self.snapshot = Arc::new(history::advance(&self.snapshot, set, self.window));
    }

    /// Run the full pipeline once with freshly generated readings.
    pub fn tick(&mut self) -> TickOutcome {
        let set = self.generator.generate();
        self.tick_with(set, Utc::now())
    }

    /// Run the pipeline with a generated reading set whose leak probability
    /// is replaced by `value`.
    pub fn tick_with_leak(&mut self, value: f64) -> TickOutcome {
        let now = Utc::now();
        let mut set = self.generator.generate_at(now);
        set.leak_probability.value = value;
        self.tick_with(set, now)
    }

    /// Run the pipeline with an externally supplied reading set.
    pub fn tick_with(&mut self, set: ReadingSet, now: DateTime<Utc>) -> TickOutcome {
        let latest_leak = set.leak_probability.clone();

        self.snapshot = Arc::new(history::advance(&self.snapshot, set, self.window));
        let breach = self.evaluator.evaluate_at(&latest_leak, now);
        self.status = self.aggregator.apply(&self.status, breach.clone());

        self.stats.ticks += 1;
        if let Some(ref b) = breach {
            self.stats.breaches += 1;
            warn!(
                tick = self.stats.ticks,
                leak_probability = latest_leak.value,
                alert_id = %b.alert.id,
                "{}",
                b.alert.message
            );
        }

        debug!(
            tick = self.stats.ticks,
            leak_probability = latest_leak.value,
            healthy = self.status.is_healthy,
            "Tick complete"
        );
        if self.stats.ticks % PROGRESS_LOG_EVERY_TICKS == 0 {
            info!(
                "📈 Progress: {} ticks | Breaches: {} | Alerts: {}/{} | Healthy: {}",
                self.stats.ticks,
                self.stats.breaches,
                self.status.alerts.len(),
                self.status.recommendations.len(),
                self.status.is_healthy
            );
        }

        TickOutcome {
            tick: self.stats.ticks,
            breach,
            snapshot: Arc::clone(&self.snapshot),
            status: Arc::clone(&self.status),
        }
    }

    pub fn snapshot(&self) -> Arc<SensorSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn status(&self) -> Arc<SystemStatus> {
        Arc::clone(&self.status)
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

// ============================================================================
// Shared Handle
// ============================================================================

struct EngineShared {
    engine: Mutex<SimulationEngine>,
    snapshot: ArcSwap<SensorSnapshot>,
    status: ArcSwap<SystemStatus>,
    stats: ArcSwap<EngineStats>,
}

/// Cloneable handle: one writer path (`tick*`), lock-free readers.
#[derive(Clone)]
pub struct EngineHandle {
    inner: Arc<EngineShared>,
}

impl EngineHandle {
    pub fn new(engine: SimulationEngine) -> Self {
        let snapshot = ArcSwap::new(engine.snapshot());
        let status = ArcSwap::new(engine.status());
        let stats = ArcSwap::from_pointee(engine.stats());
        Self {
            inner: Arc::new(EngineShared {
                engine: Mutex::new(engine),
                snapshot,
                status,
                stats,
            }),
        }
    }

    /// Run one tick and publish its results.
    pub fn tick(&self) -> TickOutcome {
        self.with_engine(SimulationEngine::tick)
    }

    /// Run one tick with a forced leak-probability value and publish it.
    pub fn tick_with_leak(&self, value: f64) -> TickOutcome {
        self.with_engine(|engine| engine.tick_with_leak(value))
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Arc<SensorSnapshot> {
        self.inner.snapshot.load_full()
    }

    /// Latest published status
    pub fn status(&self) -> Arc<SystemStatus> {
        self.inner.status.load_full()
    }

    pub fn stats(&self) -> EngineStats {
        **self.inner.stats.load()
    }

    fn with_engine(&self, run: impl FnOnce(&mut SimulationEngine) -> TickOutcome) -> TickOutcome {
        let mut engine = self.inner.engine.lock().unwrap_or_else(|e| {
            warn!("Engine mutex poisoned, recovering");
            e.into_inner()
        });
        let outcome = run(&mut *engine);
        // Publish while still holding the writer lock so ticks publish in order.
        self.inner.snapshot.store(Arc::clone(&outcome.snapshot));
        self.inner.status.store(Arc::clone(&outcome.status));
        self.inner.stats.store(Arc::new(engine.stats()));
        outcome
    }
}

impl std::fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl TickHandler for EngineHandle {
    fn on_tick(&self) {
        self.tick();
    }
}
