//! Feed identifiers and fetched payloads.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::RestockState;

/// One of the external data sources polled every cycle.
///
/// Variant order is cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    Stock,
    Weather,
    Restock,
    Items,
}

impl FeedKind {
    /// All feeds in cycle order.
    pub const ALL: [FeedKind; 4] = [
        FeedKind::Stock,
        FeedKind::Weather,
        FeedKind::Restock,
        FeedKind::Items,
    ];

    /// Snapshot field name for this feed.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedKind::Stock => "stock",
            FeedKind::Weather => "weather",
            FeedKind::Restock => "restock",
            FeedKind::Items => "items",
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data returned by a single successful feed fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedData {
    /// Opaque structured data (stock, weather, items)
    Value(Value),
    /// Computed restock schedule
    Restock(RestockState),
}

impl FeedData {
    /// Interpret this payload as a restock schedule.
    ///
    /// Plain JSON is accepted when it has the restock shape.
    pub fn into_restock(self) -> Result<RestockState> {
        match self {
            FeedData::Restock(state) => Ok(state),
            FeedData::Value(value) => serde_json::from_value(value)
                .map_err(|e| AppError::fetch(FeedKind::Restock.as_str(), e)),
        }
    }

    /// Interpret this payload as opaque JSON.
    pub fn into_value(self) -> Result<Value> {
        match self {
            FeedData::Value(value) => Ok(value),
            FeedData::Restock(state) => Ok(serde_json::to_value(state)?),
        }
    }
}
