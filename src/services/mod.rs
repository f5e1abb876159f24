//! Service layer for the feed watcher.
//!
//! This module contains the external collaborators of a poll cycle:
//! - Feed adapters (`HttpJsonFeed`, `RestockClock`)
//! - Notification sinks (`LogSink`, `WebhookSink`)

mod feeds;
mod notifier;
mod restock;

pub use feeds::{Feed, FeedSet, HttpJsonFeed};
pub use notifier::{LogSink, Message, NotificationSink, WebhookSink, build_sink};
pub use restock::RestockClock;
