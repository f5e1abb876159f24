//! Detected change events.

use serde::Serialize;
use serde_json::Value;

use crate::models::FeedKind;

/// A single notifiable change, consumed once by the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeEvent {
    /// Feed that changed
    pub feed: FeedKind,
    /// Notification subject line
    pub subject: String,
    /// New data that triggered the change
    pub payload: Value,
}

impl ChangeEvent {
    pub fn new(feed: FeedKind, subject: impl Into<String>, payload: Value) -> Self {
        Self {
            feed,
            subject: subject.into(),
            payload,
        }
    }
}
