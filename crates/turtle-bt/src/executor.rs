//! Fixed-rate driver loop for a [`BehaviourTree`].

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::{Instant, MissedTickBehavior};
use turtle_core::{Status, TurtleDriver};

use crate::error::BtError;
use crate::tree::{BehaviourTree, TickSnapshot};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Ticks per second.
    pub tick_rate_hz: f64,

    /// Tick budget; reaching it while the root is still RUNNING is a timeout.
    pub max_ticks: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 10.0,
            max_ticks: 1000,
        }
    }
}

impl ExecutorConfig {
    pub fn validate(&self) -> Result<(), BtError> {
        if !self.tick_rate_hz.is_finite() || self.tick_rate_hz <= 0.0 {
            return Err(BtError::Config(format!(
                "tick_rate_hz must be a positive number, got {}",
                self.tick_rate_hz
            )));
        }
        if self.max_ticks == 0 {
            return Err(BtError::Config("max_ticks must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate_hz)
    }
}

/// How a run ended. A timeout is not a failure: the tree simply did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    Failure,
    Timeout,
    Interrupted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub outcome: Outcome,
    pub ticks: u64,
    pub final_status: Status,
    pub elapsed: Duration,
}

/// Receives the per-tick view of the tree.
pub trait TickObserver {
    fn on_start(&mut self, _rendered: &str) {}

    fn on_tick(&mut self, snapshot: &TickSnapshot);

    fn on_finish(&mut self, _report: &RunReport, _rendered: &str) {}
}

/// Logs root status changes and the final outcome through `tracing`.
#[derive(Debug, Default)]
pub struct LogObserver {
    last: Option<Status>,
}

impl TickObserver for LogObserver {
    fn on_tick(&mut self, snapshot: &TickSnapshot) {
        tracing::debug!(
            tick = snapshot.tick,
            path = %snapshot.tick_path().join(" -> "),
            "tick"
        );
        if self.last != Some(snapshot.root_status) {
            tracing::info!(tick = snapshot.tick, status = %snapshot.root_status, "Root status changed");
            self.last = Some(snapshot.root_status);
        }
    }

    fn on_finish(&mut self, report: &RunReport, _rendered: &str) {
        match report.outcome {
            Outcome::Success => {
                tracing::info!(ticks = report.ticks, "Behavior tree completed successfully")
            }
            Outcome::Failure => tracing::error!(ticks = report.ticks, "Behavior tree failed"),
            Outcome::Timeout => {
                tracing::warn!(ticks = report.ticks, "Behavior tree execution timed out")
            }
            Outcome::Interrupted => {
                tracing::info!(ticks = report.ticks, "Behavior tree execution interrupted")
            }
        }
    }
}

pub struct Executor {
    config: ExecutorConfig,
    observer: Box<dyn TickObserver>,
}

impl Executor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self {
            config,
            observer: Box::new(LogObserver::default()),
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn TickObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Set up the tree, then tick it at the configured rate until the root resolves, the tick
    /// budget runs out, or `shutdown` completes.
    ///
    /// Setup failures are returned before any tick. On timeout or shutdown the RUNNING chain is
    /// halted before returning.
    pub async fn run<D, F>(
        &mut self,
        tree: &mut BehaviourTree<D>,
        shutdown: F,
    ) -> Result<RunReport, BtError>
    where
        D: TurtleDriver,
        F: Future<Output = ()>,
    {
        self.config.validate()?;
        tree.setup()?;

        let period = self.config.period();
        tree.set_dt(period.as_secs_f64());
        tracing::info!(
            tick_rate_hz = self.config.tick_rate_hz,
            max_ticks = self.config.max_ticks,
            "Starting behavior tree execution"
        );
        self.observer.on_start(&tree.render());

        let started = Instant::now();
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut ticks = 0u64;
        let outcome = loop {
            if ticks >= self.config.max_ticks {
                tree.halt();
                break Outcome::Timeout;
            }

            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tree.halt();
                    break Outcome::Interrupted;
                }
                _ = interval.tick() => {}
            }

            let status = tree.tick();
            ticks += 1;
            self.observer.on_tick(&tree.snapshot());

            match status {
                Status::Success => break Outcome::Success,
                Status::Failure => break Outcome::Failure,
                Status::Running | Status::Invalid => {}
            }
        };

        let report = RunReport {
            outcome,
            ticks,
            final_status: tree.status(),
            elapsed: started.elapsed(),
        };
        self.observer.on_finish(&report, &tree.render());
        Ok(report)
    }
}
