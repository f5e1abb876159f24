//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::RestockCategory;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Poll period and per-feed time bounds
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Snapshot location
    #[serde(default)]
    pub storage: StorageConfig,

    /// Feed endpoints
    #[serde(default)]
    pub feeds: FeedsConfig,

    /// Restock periods per category
    #[serde(default)]
    pub restock: RestockConfig,

    /// Change detection policy
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Notification sink settings
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Manual trigger / read surface
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Unparseable numeric values are ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => log::warn!("Ignoring invalid PORT value {:?}", port),
            }
        }
        if let Some(secs) = lookup("POLL_INTERVAL_SECS") {
            match secs.parse() {
                Ok(secs) => self.scheduler.interval_secs = secs,
                Err(_) => log::warn!("Ignoring invalid POLL_INTERVAL_SECS value {:?}", secs),
            }
        }
        if let Some(path) = lookup("SNAPSHOT_PATH") {
            self.storage.snapshot_path = PathBuf::from(path);
        }
        if let Some(url) = lookup("NOTIFY_WEBHOOK_URL") {
            self.notifier.kind = NotifierKind::Webhook;
            self.notifier.webhook_url = Some(url);
        }
        if let Some(recipient) = lookup("NOTIFY_RECIPIENT") {
            self.notifier.recipient = Some(recipient);
        }
        if let Some(token) = lookup("NOTIFY_TOKEN") {
            self.notifier.token = Some(token);
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.scheduler.interval_secs == 0 {
            return Err(AppError::validation("scheduler.interval_secs must be > 0"));
        }
        if self.scheduler.fetch_timeout_secs == 0 {
            return Err(AppError::validation(
                "scheduler.fetch_timeout_secs must be > 0",
            ));
        }
        if self.feeds.user_agent.trim().is_empty() {
            return Err(AppError::validation("feeds.user_agent is empty"));
        }
        for category in RestockCategory::ALL {
            if self.restock.period_secs(category) == 0 {
                return Err(AppError::validation(format!(
                    "restock period for {} must be > 0",
                    category
                )));
            }
        }
        if self.notifier.kind == NotifierKind::Webhook && self.notifier.webhook_url.is_none() {
            return Err(AppError::validation(
                "notifier.webhook_url is required for the webhook notifier",
            ));
        }
        if self.server.port == 0 {
            return Err(AppError::validation("server.port must be > 0"));
        }
        Ok(())
    }
}

/// Scheduling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between timer-driven cycles
    #[serde(default = "defaults::interval")]
    pub interval_secs: u64,

    /// Upper bound on a single feed fetch
    #[serde(default = "defaults::fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

impl SchedulerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::interval(),
            fetch_timeout_secs: defaults::fetch_timeout(),
        }
    }
}

/// Snapshot storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "defaults::snapshot_path")]
    pub snapshot_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot_path: defaults::snapshot_path(),
        }
    }
}

/// Feed endpoints. A feed without a URL is not polled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedsConfig {
    /// User-Agent header for feed requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    #[serde(default)]
    pub stock_url: Option<String>,

    #[serde(default)]
    pub weather_url: Option<String>,

    #[serde(default)]
    pub items_url: Option<String>,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            stock_url: None,
            weather_url: None,
            items_url: None,
        }
    }
}

/// Restock period per category, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestockConfig {
    #[serde(default = "defaults::egg")]
    pub egg: u64,
    #[serde(default = "defaults::gear")]
    pub gear: u64,
    #[serde(default = "defaults::seeds")]
    pub seeds: u64,
    #[serde(default = "defaults::cosmetic")]
    pub cosmetic: u64,
    #[serde(default = "defaults::swarm_event")]
    pub swarm_event: u64,
}

impl RestockConfig {
    pub fn period_secs(&self, category: RestockCategory) -> u64 {
        match category {
            RestockCategory::Egg => self.egg,
            RestockCategory::Gear => self.gear,
            RestockCategory::Seeds => self.seeds,
            RestockCategory::Cosmetic => self.cosmetic,
            RestockCategory::SwarmEvent => self.swarm_event,
        }
    }
}

impl Default for RestockConfig {
    fn default() -> Self {
        Self {
            egg: defaults::egg(),
            gear: defaults::gear(),
            seeds: defaults::seeds(),
            cosmetic: defaults::cosmetic(),
            swarm_event: defaults::swarm_event(),
        }
    }
}

/// Change detection policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Notify when a stock/weather/items snapshot slot goes from empty to
    /// populated.
    ///
    /// When `false`, any empty slot is filled silently, not only on the first
    /// cycle: a feed that never succeeded before, or that last returned
    /// `null`, is treated as a fresh baseline.
    #[serde(default = "defaults::notify_first")]
    pub notify_on_first_observation: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            notify_on_first_observation: defaults::notify_first(),
        }
    }
}

/// Notification sink type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    #[default]
    Log,
    Webhook,
}

/// Notification sink settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifierConfig {
    #[serde(default)]
    pub kind: NotifierKind,

    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Destination address forwarded to the sink
    #[serde(default)]
    pub recipient: Option<String>,

    /// Bearer credential for the sink
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
}

/// HTTP surface settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "defaults::host")]
    pub host: String,

    #[serde(default = "defaults::port")]
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::host(),
            port: defaults::port(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Scheduler defaults
    pub fn interval() -> u64 {
        300
    }
    pub fn fetch_timeout() -> u64 {
        30
    }

    // Storage defaults
    pub fn snapshot_path() -> PathBuf {
        PathBuf::from("data/snapshot.json")
    }

    // Feed defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; garden-watch/0.1)".into()
    }

    // Restock defaults
    pub fn egg() -> u64 {
        30 * 60
    }
    pub fn gear() -> u64 {
        5 * 60
    }
    pub fn seeds() -> u64 {
        5 * 60
    }
    pub fn cosmetic() -> u64 {
        4 * 60 * 60
    }
    pub fn swarm_event() -> u64 {
        60 * 60
    }

    pub fn notify_first() -> bool {
        true
    }

    // Server defaults
    pub fn host() -> String {
        "0.0.0.0".into()
    }
    pub fn port() -> u16 {
        3000
    }
}
