// src/pipeline/cycle.rs

//! Poll cycle orchestration.
//!
//! A cycle fetches every registered feed concurrently, then walks the
//! results in cycle order (stock, weather, restock, items): detect changes,
//! dispatch one notification per change, stage the new value into a working
//! copy of the snapshot. The working copy is saved once at the end and
//! becomes the in-memory snapshot whether or not the save succeeded.
//!
//! The snapshot lives behind an async mutex. Holding that lock *is* running
//! a cycle, so two cycles can never overlap. Triggers that arrive while a
//! cycle is running collapse into a single follow-up cycle: the first waiter
//! runs it, the others receive its report.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};

use crate::error::{AppError, Result};
use crate::models::{FeedData, FeedKind, SchedulerConfig, Snapshot};
use crate::pipeline::{ChangeDetector, Dispatcher};
use crate::services::{Feed, FeedSet};
use crate::storage::SnapshotStore;

/// What happened to one feed during a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FeedOutcome {
    /// Fetched, differed from the snapshot
    Changed { notifications: usize },
    /// Fetched, nothing to report
    Unchanged,
    /// Fetch or decode failed; previous value kept
    Failed { error: String },
    /// No adapter registered for this feed
    Skipped,
}

/// Summary of a completed cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub feeds: BTreeMap<FeedKind, FeedOutcome>,
    pub notifications_sent: usize,
    pub notifications_failed: usize,
    pub persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persist_error: Option<String>,
}

impl CycleReport {
    fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: started_at,
            feeds: BTreeMap::new(),
            notifications_sent: 0,
            notifications_failed: 0,
            persisted: false,
            persist_error: None,
        }
    }

    /// Feeds whose fetch failed this cycle.
    pub fn failed_feeds(&self) -> Vec<FeedKind> {
        self.feeds
            .iter()
            .filter(|(_, outcome)| matches!(outcome, FeedOutcome::Failed { .. }))
            .map(|(kind, _)| *kind)
            .collect()
    }

    pub fn outcome(&self, kind: FeedKind) -> Option<&FeedOutcome> {
        self.feeds.get(&kind)
    }
}

/// State guarded for the duration of a cycle.
#[derive(Default)]
struct CycleState {
    snapshot: Snapshot,
    last_report: Option<CycleReport>,
}

/// Owns the snapshot and runs poll cycles over it.
pub struct CycleRunner {
    feeds: FeedSet,
    detector: ChangeDetector,
    dispatcher: Dispatcher,
    store: Arc<dyn SnapshotStore>,
    fetch_timeout: Duration,
    state: Mutex<CycleState>,
    /// Number of cycles started, bumped under the state lock
    cycles_started: AtomicU64,
    latest_items: RwLock<Option<Value>>,
}

impl CycleRunner {
    /// Create a runner starting from an empty snapshot.
    pub fn new(feeds: FeedSet, dispatcher: Dispatcher, store: Arc<dyn SnapshotStore>) -> Self {
        Self {
            feeds,
            detector: ChangeDetector::new(),
            dispatcher,
            store,
            fetch_timeout: SchedulerConfig::default().fetch_timeout(),
            state: Mutex::new(CycleState::default()),
            cycles_started: AtomicU64::new(0),
            latest_items: RwLock::new(None),
        }
    }

    pub fn with_detector(mut self, detector: ChangeDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Start from an explicit snapshot instead of the store's copy.
    pub fn with_snapshot(mut self, snapshot: Snapshot) -> Self {
        self.latest_items = RwLock::new(snapshot.items.clone());
        self.state = Mutex::new(CycleState {
            snapshot,
            last_report: None,
        });
        self
    }

    /// Replace the in-memory snapshot with the persisted one.
    ///
    /// An unreadable snapshot is logged and the runner keeps its current state.
    pub async fn restore(&self) {
        let mut state = self.state.lock().await;
        match self.store.load().await {
            Ok(snapshot) => {
                *self.latest_items.write().await = snapshot.items.clone();
                state.snapshot = snapshot;
            }
            Err(e) => log::warn!("Could not load snapshot, starting empty: {}", e),
        }
    }

    /// Copy of the current snapshot. Waits for an in-flight cycle.
    pub async fn snapshot(&self) -> Snapshot {
        self.state.lock().await.snapshot.clone()
    }

    /// Most recently fetched item catalog, if any.
    pub async fn latest_items(&self) -> Option<Value> {
        self.latest_items.read().await.clone()
    }

    /// Run one cycle that starts after this call, waiting for any in-flight
    /// cycle to finish first.
    ///
    /// If another waiter already ran a cycle that started after this call,
    /// its report is returned instead of running yet another cycle.
    pub async fn run_cycle(&self) -> CycleReport {
        let seen = self.cycles_started.load(Ordering::SeqCst);
        let mut state = self.state.lock().await;

        if self.cycles_started.load(Ordering::SeqCst) > seen {
            if let Some(report) = &state.last_report {
                log::info!("Trigger satisfied by cycle started at {}", report.started_at);
                return report.clone();
            }
        }
        self.run_locked(&mut state).await
    }

    /// Run one cycle unless another cycle is already in flight.
    pub async fn try_run_cycle(&self) -> Option<CycleReport> {
        let mut state = self.state.try_lock().ok()?;
        Some(self.run_locked(&mut state).await)
    }

    async fn run_locked(&self, state: &mut CycleState) -> CycleReport {
        self.cycles_started.fetch_add(1, Ordering::SeqCst);
        let current = &mut state.snapshot;
        let mut report = CycleReport::new(Utc::now());
        log::info!("Cycle starting ({} feeds registered)", self.feeds.len());

        let fetched = join_all(self.feeds.iter().map(|feed| self.fetch_bounded(feed.as_ref()))).await;

        let mut working = current.clone();
        for kind in FeedKind::ALL {
            if self.feeds.get(kind).is_none() {
                report.feeds.insert(kind, FeedOutcome::Skipped);
            }
        }

        for (kind, result) in fetched {
            let outcome = match result {
                Ok(data) => self.process(kind, data, &mut working, &mut report).await,
                Err(e) => Err(e),
            };
            let outcome = outcome.unwrap_or_else(|e| {
                log::warn!("{} feed failed, keeping previous value: {}", kind, e);
                FeedOutcome::Failed {
                    error: e.to_string(),
                }
            });
            report.feeds.insert(kind, outcome);
        }

        match self.store.save(&working).await {
            Ok(()) => report.persisted = true,
            Err(e) => {
                log::error!("Snapshot not persisted, keeping it in memory: {}", e);
                report.persist_error = Some(e.to_string());
            }
        }
        *current = working;

        report.finished_at = Utc::now();
        log::info!(
            "Cycle complete: {} sent, {} failed notifications, {} feed failures, persisted={}",
            report.notifications_sent,
            report.notifications_failed,
            report.failed_feeds().len(),
            report.persisted
        );
        state.last_report = Some(report.clone());
        report
    }

    async fn fetch_bounded(&self, feed: &dyn Feed) -> (FeedKind, Result<FeedData>) {
        let kind = feed.kind();
        let result = match tokio::time::timeout(self.fetch_timeout, feed.fetch()).await {
            Ok(result) => result,
            Err(_) => Err(AppError::timeout(kind.as_str(), self.fetch_timeout.as_secs())),
        };
        (kind, result)
    }

    async fn process(
        &self,
        kind: FeedKind,
        data: FeedData,
        working: &mut Snapshot,
        report: &mut CycleReport,
    ) -> Result<FeedOutcome> {
        let events = self.detector.detect(kind, &data, working)?;

        for event in &events {
            if self.dispatcher.notify(event).await {
                report.notifications_sent += 1;
            } else {
                report.notifications_failed += 1;
            }
        }

        working.stage(kind, data)?;
        if kind == FeedKind::Items {
            *self.latest_items.write().await = working.items.clone();
        }

        if events.is_empty() {
            log::info!("{}: unchanged", kind);
            Ok(FeedOutcome::Unchanged)
        } else {
            log::info!("{}: {} change(s)", kind, events.len());
            Ok(FeedOutcome::Changed {
                notifications: events.len(),
            })
        }
    }
}
