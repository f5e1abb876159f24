// src/error.rs

//! Unified error handling for the feed watcher.
//!
//! The variants map onto the three recoverable failure classes of a poll
//! cycle: fetch failures (one feed), notification failures (one message) and
//! persistence failures (the snapshot write). None of them stop the process.

use std::fmt;

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A feed could not be fetched or returned unusable data
    #[error("Fetch error for {feed}: {message}")]
    Fetch { feed: String, message: String },

    /// A feed fetch exceeded its time bound
    #[error("Fetch for {feed} timed out after {secs}s")]
    Timeout { feed: String, secs: u64 },

    /// The notification sink rejected or failed to deliver a message
    #[error("Notification error: {0}")]
    Notification(String),

    /// Snapshot could not be written or read back
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a fetch error for the named feed.
    pub fn fetch(feed: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            feed: feed.into(),
            message: message.to_string(),
        }
    }

    /// Create a timeout error for the named feed.
    pub fn timeout(feed: impl Into<String>, secs: u64) -> Self {
        Self::Timeout {
            feed: feed.into(),
            secs,
        }
    }

    /// Create a notification error.
    pub fn notification(message: impl fmt::Display) -> Self {
        Self::Notification(message.to_string())
    }

    /// Create a persistence error.
    pub fn persistence(message: impl fmt::Display) -> Self {
        Self::Persistence(message.to_string())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether this error belongs to the fetch class (recovered per feed).
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::Timeout { .. })
    }
}
