// src/services/restock.rs

//! Computed restock schedule.
//!
//! Restocks happen on fixed wall-clock boundaries: a category with period
//! `P` restocks whenever epoch time is a multiple of `P`. No network access
//! is needed to know when the last restock happened.

use async_trait::async_trait;
use chrono::Utc;

use crate::error::Result;
use crate::models::{FeedData, FeedKind, RestockCategory, RestockConfig, RestockEntry, RestockState};
use crate::services::Feed;

/// Restock feed computed from per-category periods.
#[derive(Debug, Clone)]
pub struct RestockClock {
    periods: RestockConfig,
}

impl RestockClock {
    pub fn new(periods: RestockConfig) -> Self {
        Self { periods }
    }

    /// Compute the schedule for every category at `now_ms` (epoch millis).
    pub fn compute_at(&self, now_ms: i64) -> RestockState {
        RestockCategory::ALL
            .into_iter()
            .filter_map(|category| {
                let period_ms = i64::try_from(self.periods.period_secs(category))
                    .ok()?
                    .checked_mul(1000)?;
                if period_ms <= 0 {
                    return None;
                }
                let last_restock = now_ms - now_ms.rem_euclid(period_ms);
                let remaining_ms = last_restock + period_ms - now_ms;
                Some((
                    category,
                    RestockEntry {
                        last_restock,
                        countdown: format_countdown(remaining_ms),
                    },
                ))
            })
            .collect()
    }

    /// Compute the schedule for the current time.
    pub fn compute(&self) -> RestockState {
        self.compute_at(Utc::now().timestamp_millis())
    }
}

#[async_trait]
impl Feed for RestockClock {
    fn kind(&self) -> FeedKind {
        FeedKind::Restock
    }

    async fn fetch(&self) -> Result<FeedData> {
        Ok(FeedData::Restock(self.compute()))
    }
}

/// Format a duration in milliseconds as `HHhMMmSSs`.
fn format_countdown(remaining_ms: i64) -> String {
    let total = remaining_ms.max(0) / 1000;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{:02}h{:02}m{:02}s", hours, minutes, seconds)
}
