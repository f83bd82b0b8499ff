//! Blink scheduling.
//!
//! Two states, `Open` and `Blinking`. From `Open` the eyes close after a
//! uniformly random interval; they reopen after a fixed duration and the
//! next interval is drawn immediately. The loop runs on the tokio runtime
//! until its [`BlinkHandle`] is cancelled or dropped.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::task::JoinHandle;

use peeper_common::config::BlinkConfig;
use peeper_common::error::{PeeperError, PeeperResult};
use peeper_widget_model::BlinkState;

/// Receives every blink state change.
pub type BlinkSink = Arc<dyn Fn(BlinkState) + Send + Sync>;

/// Blink cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkTiming {
    /// Inclusive lower bound of the open interval, in ms.
    pub min_interval_ms: u64,
    /// Exclusive upper bound of the open interval, in ms.
    pub max_interval_ms: u64,
    /// How long the eyes stay closed.
    pub duration: Duration,
}

impl Default for BlinkTiming {
    fn default() -> Self {
        Self::from(&BlinkConfig::default())
    }
}

impl From<&BlinkConfig> for BlinkTiming {
    fn from(config: &BlinkConfig) -> Self {
        Self {
            min_interval_ms: config.min_interval_ms,
            max_interval_ms: config.max_interval_ms,
            duration: Duration::from_millis(config.duration_ms),
        }
    }
}

/// Draws successive open intervals.
///
/// Intervals are whole milliseconds, uniform over
/// `[min_interval_ms, max_interval_ms)`.
#[derive(Debug)]
pub struct BlinkCycle<R> {
    timing: BlinkTiming,
    rng: R,
}

impl BlinkCycle<StdRng> {
    /// Cycle seeded from OS entropy.
    pub fn from_entropy(timing: BlinkTiming) -> Self {
        Self::new(timing, StdRng::from_entropy())
    }

    /// Reproducible cycle.
    pub fn seeded(timing: BlinkTiming, seed: u64) -> Self {
        Self::new(timing, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> BlinkCycle<R> {
    pub fn new(timing: BlinkTiming, rng: R) -> Self {
        Self { timing, rng }
    }

    /// Time to stay open before the next blink.
    pub fn next_interval(&mut self) -> Duration {
        let (lo, hi) = (self.timing.min_interval_ms, self.timing.max_interval_ms);
        if lo >= hi {
            return Duration::from_millis(lo);
        }
        Duration::from_millis(self.rng.gen_range(lo..hi))
    }

    /// Time to stay closed.
    pub fn duration(&self) -> Duration {
        self.timing.duration
    }

    /// Plan the first `cycles` blinks, as offsets from the start.
    pub fn plan(&mut self, cycles: usize) -> Vec<PlannedBlink> {
        let mut at = Duration::ZERO;
        let mut plan = Vec::with_capacity(cycles);
        for _ in 0..cycles {
            let interval = self.next_interval();
            let closes_at = at + interval;
            let opens_at = closes_at + self.duration();
            plan.push(PlannedBlink {
                interval,
                closes_at,
                opens_at,
            });
            at = opens_at;
        }
        plan
    }
}

/// One blink of a simulated schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedBlink {
    /// Time spent open before this blink.
    pub interval: Duration,
    pub closes_at: Duration,
    pub opens_at: Duration,
}

/// Spawns the blink loop.
pub struct BlinkScheduler;

impl BlinkScheduler {
    /// Start blinking on the current tokio runtime.
    ///
    /// Fails only when called outside a runtime.
    pub fn start(timing: BlinkTiming, sink: BlinkSink) -> PeeperResult<BlinkHandle> {
        Self::start_with(BlinkCycle::from_entropy(timing), sink)
    }

    /// Start blinking with a caller-supplied interval source.
    pub fn start_with<R>(cycle: BlinkCycle<R>, sink: BlinkSink) -> PeeperResult<BlinkHandle>
    where
        R: Rng + Send + 'static,
    {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| PeeperError::platform(format!("blink loop needs a tokio runtime: {e}")))?;
        let task = runtime.spawn(run(cycle, sink));
        tracing::debug!("Blink loop started");
        Ok(BlinkHandle { task: Some(task) })
    }
}

async fn run<R: Rng>(mut cycle: BlinkCycle<R>, sink: BlinkSink) {
    loop {
        tokio::time::sleep(cycle.next_interval()).await;
        sink(BlinkState::CLOSED);
        tokio::time::sleep(cycle.duration()).await;
        sink(BlinkState::OPEN);
    }
}

/// Owner of a running blink loop.
#[derive(Debug)]
pub struct BlinkHandle {
    task: Option<JoinHandle<()>>,
}

impl BlinkHandle {
    /// Stop the loop. Returns `false` if it was already cancelled.
    pub fn cancel(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                task.abort();
                tracing::debug!("Blink loop cancelled");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for BlinkHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
