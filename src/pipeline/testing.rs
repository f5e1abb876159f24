//! Hand-written fakes shared by the pipeline tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{FeedData, FeedKind, Snapshot};
use crate::services::{Feed, Message, NotificationSink};
use crate::storage::SnapshotStore;

/// Feed returning whatever data was last set.
pub struct FixedFeed {
    kind: FeedKind,
    data: Mutex<FeedData>,
}

impl FixedFeed {
    pub fn new(kind: FeedKind, data: FeedData) -> Arc<Self> {
        Arc::new(Self {
            kind,
            data: Mutex::new(data),
        })
    }

    pub fn set(&self, data: FeedData) {
        *self.data.lock().unwrap() = data;
    }
}

#[async_trait]
impl Feed for FixedFeed {
    fn kind(&self) -> FeedKind {
        self.kind
    }

    async fn fetch(&self) -> Result<FeedData> {
        Ok(self.data.lock().unwrap().clone())
    }
}

/// Feed that always fails.
pub struct FailingFeed(pub FeedKind);

#[async_trait]
impl Feed for FailingFeed {
    fn kind(&self) -> FeedKind {
        self.0
    }

    async fn fetch(&self) -> Result<FeedData> {
        Err(AppError::fetch(self.0.as_str(), "connection reset"))
    }
}

/// Feed that never answers within any reasonable timeout.
pub struct HangingFeed(pub FeedKind);

#[async_trait]
impl Feed for HangingFeed {
    fn kind(&self) -> FeedKind {
        self.0
    }

    async fn fetch(&self) -> Result<FeedData> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(AppError::fetch(self.0.as_str(), "unreachable"))
    }
}

/// Sink recording every message it accepts.
#[derive(Clone, Default)]
pub struct RecordingSink {
    pub messages: Arc<Mutex<Vec<Message>>>,
}

impl RecordingSink {
    pub fn subjects(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .map(|m| m.subject.clone())
            .collect()
    }

    pub fn count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.messages.lock().unwrap().clear();
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send(&self, message: &Message) -> Result<()> {
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Sink rejecting every message.
pub struct RejectingSink;

#[async_trait]
impl NotificationSink for RejectingSink {
    async fn send(&self, _message: &Message) -> Result<()> {
        Err(AppError::notification("relay refused"))
    }
}

/// In-memory store that tracks concurrent writers.
#[derive(Default)]
pub struct MemoryStore {
    pub saved: Mutex<Option<Snapshot>>,
    pub save_delay: Duration,
    pub fail_saves: bool,
    pub saves: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl MemoryStore {
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            saved: Mutex::new(Some(snapshot)),
            ..Self::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            save_delay: delay,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    pub fn last_saved(&self) -> Option<Snapshot> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn load(&self) -> Result<Snapshot> {
        Ok(self.last_saved().unwrap_or_default())
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.save_delay.is_zero() {
            tokio::time::sleep(self.save_delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if self.fail_saves {
            return Err(AppError::persistence("disk full"));
        }
        *self.saved.lock().unwrap() = Some(snapshot.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
