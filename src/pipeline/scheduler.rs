//! Timer-driven cycle scheduling.
//!
//! The first tick fires immediately, then every `period`. A tick that finds
//! a cycle already running (usually a manual trigger) is dropped rather than
//! queued; manual triggers go through `CycleRunner::run_cycle`, which folds
//! concurrent waiters into one follow-up cycle.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

use crate::pipeline::{CycleReport, CycleRunner};

/// Runs cycles on a fixed period.
pub struct Scheduler {
    runner: Arc<CycleRunner>,
    period: Duration,
}

impl Scheduler {
    pub fn new(runner: Arc<CycleRunner>, period: Duration) -> Self {
        Self { runner, period }
    }

    /// Spawn the scheduling loop onto the runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run the scheduling loop until the task is dropped.
    pub async fn run(self) {
        let mut tick = interval(self.period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        log::info!("Scheduler started, period {}s", self.period.as_secs());

        loop {
            tick.tick().await;
            self.tick().await;
        }
    }

    async fn tick(&self) -> Option<CycleReport> {
        let report = self.runner.try_run_cycle().await;
        if report.is_none() {
            log::info!("Cycle already in progress, skipping scheduled run");
        }
        report
    }
}
