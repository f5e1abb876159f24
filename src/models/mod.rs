// src/models/mod.rs

//! Domain models for the feed watcher.
//!
//! This module contains the data structures shared by the feed adapters,
//! the change detector and the snapshot store.

mod change;
mod config;
mod feed;
mod restock;
mod snapshot;

// Re-export all public types
pub use change::ChangeEvent;
pub use config::{
    Config, DetectionConfig, FeedsConfig, NotifierConfig, NotifierKind, RestockConfig,
    SchedulerConfig, ServerConfig, StorageConfig,
};
pub use feed::{FeedData, FeedKind};
pub use restock::{RestockCategory, RestockEntry, RestockState};
pub use snapshot::Snapshot;
