// src/app.rs

//! Wiring from configuration to a ready-to-run cycle runner.

use std::sync::Arc;

use crate::error::Result;
use crate::models::{Config, FeedKind};
use crate::pipeline::{ChangeDetector, CycleRunner, Dispatcher};
use crate::services::{FeedSet, HttpJsonFeed, RestockClock, build_sink};
use crate::storage::LocalSnapshotStore;
use crate::utils::http::create_async_client;

/// Register the configured feeds. The restock clock is always present.
pub fn build_feeds(config: &Config, client: &reqwest::Client) -> FeedSet {
    let mut feeds = FeedSet::new();

    let endpoints = [
        (FeedKind::Stock, &config.feeds.stock_url),
        (FeedKind::Weather, &config.feeds.weather_url),
        (FeedKind::Items, &config.feeds.items_url),
    ];
    for (kind, url) in endpoints {
        match url {
            Some(url) => feeds.insert(Arc::new(HttpJsonFeed::new(kind, url.clone(), client.clone()))),
            None => log::warn!("No URL configured for {} feed, it will be skipped", kind),
        }
    }

    feeds.insert(Arc::new(RestockClock::new(config.restock.clone())));
    feeds
}

/// Build a runner from configuration and load the persisted snapshot.
pub async fn build_runner(config: &Config) -> Result<CycleRunner> {
    let client = create_async_client(&config.feeds, config.scheduler.fetch_timeout())?;
    let feeds = build_feeds(config, &client);
    let sink = build_sink(&config.notifier, client)?;
    let store = Arc::new(LocalSnapshotStore::new(&config.storage.snapshot_path));

    let runner = CycleRunner::new(feeds, Dispatcher::new(sink), store)
        .with_detector(ChangeDetector::with_first_observation(
            config.detection.notify_on_first_observation,
        ))
        .with_fetch_timeout(config.scheduler.fetch_timeout());
    runner.restore().await;

    Ok(runner)
}
