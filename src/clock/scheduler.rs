//! Repeating-timer scheduler abstraction.
//!
//! The clock only ever asks for "run this every `period` until I cancel".
//! [`TokioScheduler`] backs that with a spawned task driving
//! `tokio::time::interval`; tests substitute a manual scheduler.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Callback run on every period
pub type RepeatingTask = Box<dyn FnMut() + Send + 'static>;

/// Source of repeating timers
pub trait Scheduler: Send {
    /// Run `task` every `period`, first firing one period from now.
    fn schedule_repeating(&self, period: Duration, task: RepeatingTask) -> TimerHandle;
}

// ============================================================================
// Timer Handle
// ============================================================================

/// Cancellation handle for one scheduled timer. Dropping it cancels the timer.
#[derive(Debug)]
pub struct TimerHandle {
    token: CancellationToken,
}

impl TimerHandle {
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

// ============================================================================
// Tokio Scheduler
// ============================================================================

#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Scheduler bound to the runtime we are currently inside, if any.
    pub fn try_current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_repeating(&self, period: Duration, mut task: RepeatingTask) -> TimerHandle {
        let token = CancellationToken::new();
        let cancelled = token.clone();

        self.handle.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => {
                        debug!(period_ms = period.as_millis() as u64, "Timer cancelled");
                        break;
                    }
                    _ = ticker.tick() => task(),
                }
            }
        });

        TimerHandle::new(token)
    }
}
