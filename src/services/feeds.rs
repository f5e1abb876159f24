// src/services/feeds.rs

//! Feed contract and the generic HTTP JSON adapter.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{FeedData, FeedKind};

/// An external data source polled once per cycle.
#[async_trait]
pub trait Feed: Send + Sync {
    /// Which snapshot field this feed fills.
    fn kind(&self) -> FeedKind;

    /// Fetch the current data for this feed.
    async fn fetch(&self) -> Result<FeedData>;
}

/// The set of feeds polled by a cycle, at most one per kind.
#[derive(Clone, Default)]
pub struct FeedSet {
    feeds: BTreeMap<FeedKind, Arc<dyn Feed>>,
}

impl FeedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a feed, replacing any feed of the same kind.
    pub fn with(mut self, feed: Arc<dyn Feed>) -> Self {
        self.insert(feed);
        self
    }

    pub fn insert(&mut self, feed: Arc<dyn Feed>) {
        let kind = feed.kind();
        if self.feeds.insert(kind, feed).is_some() {
            log::warn!("Replacing previously registered {} feed", kind);
        }
    }

    pub fn get(&self, kind: FeedKind) -> Option<&Arc<dyn Feed>> {
        self.feeds.get(&kind)
    }

    /// Registered feeds in cycle order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Feed>> {
        self.feeds.values()
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }
}

/// Fetches a JSON document from a fixed URL.
pub struct HttpJsonFeed {
    kind: FeedKind,
    url: String,
    client: Client,
}

impl HttpJsonFeed {
    pub fn new(kind: FeedKind, url: impl Into<String>, client: Client) -> Self {
        Self {
            kind,
            url: url.into(),
            client,
        }
    }
}

#[async_trait]
impl Feed for HttpJsonFeed {
    fn kind(&self) -> FeedKind {
        self.kind
    }

    async fn fetch(&self) -> Result<FeedData> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AppError::fetch(self.kind.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::fetch(
                self.kind.as_str(),
                format!("{} returned {}", self.url, status),
            ));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| AppError::fetch(self.kind.as_str(), e))?;

        log::debug!("Fetched {} from {}", self.kind, self.url);
        Ok(FeedData::Value(value))
    }
}
