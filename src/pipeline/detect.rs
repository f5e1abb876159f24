//! Change detection between fetched feed data and the snapshot.
//!
//! Stock, weather and items compare by canonical content hash, so key
//! order and `null`-versus-absent never register as changes. Restock compares
//! only the `LastRestock` timestamp of each category and requires a prior
//! observation of that category before it reports anything.

use serde_json::{Value, json};

use crate::error::Result;
use crate::models::{ChangeEvent, FeedData, FeedKind, RestockCategory, RestockState, Snapshot};
use crate::utils::hash::content_hash;

/// Detector deciding which fetched data is worth a notification.
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    /// Whether an empty snapshot slot counts as "changed" for value feeds
    notify_on_first_observation: bool,
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeDetector {
    /// Create a detector that notifies on first observation of value feeds.
    pub fn new() -> Self {
        Self {
            notify_on_first_observation: true,
        }
    }

    /// Create a detector that treats first observations as baseline only.
    pub fn baseline_first() -> Self {
        Self {
            notify_on_first_observation: false,
        }
    }

    /// Create a detector with the first-observation policy set explicitly.
    ///
    /// The policy applies whenever a value feed's snapshot slot is empty.
    pub fn with_first_observation(notify_on_first_observation: bool) -> Self {
        Self {
            notify_on_first_observation,
        }
    }

    /// Compare `data` for feed `kind` against `snapshot`.
    pub fn detect(&self, kind: FeedKind, data: &FeedData, snapshot: &Snapshot) -> Result<Vec<ChangeEvent>> {
        match kind {
            FeedKind::Restock => {
                let current = data.clone().into_restock()?;
                Ok(detect_restock(&current, snapshot.restock.as_ref()))
            }
            _ => {
                let current = data.clone().into_value()?;
                Ok(self
                    .detect_value(kind, &current, snapshot.value(kind))
                    .into_iter()
                    .collect())
            }
        }
    }

    fn detect_value(&self, kind: FeedKind, current: &Value, previous: Option<&Value>) -> Option<ChangeEvent> {
        let current_hash = content_hash(Some(current));
        let previous_hash = content_hash(previous);

        if current_hash == previous_hash {
            return None;
        }
        if previous_hash.is_none() && !self.notify_on_first_observation {
            log::debug!("First observation of {} recorded as baseline", kind);
            return None;
        }

        Some(ChangeEvent::new(kind, value_subject(kind), current.clone()))
    }
}

/// Report categories whose `LastRestock` moved since the previous observation.
pub fn detect_restock(current: &RestockState, previous: Option<&RestockState>) -> Vec<ChangeEvent> {
    let Some(previous) = previous else {
        log::debug!("No prior restock data, recording baseline");
        return Vec::new();
    };

    RestockCategory::ALL
        .iter()
        .filter_map(|category| {
            let before = previous.get(category)?;
            let after = current.get(category)?;
            if before.last_restock == after.last_restock {
                return None;
            }
            Some(ChangeEvent::new(
                FeedKind::Restock,
                format!("Restock: {} restocked", category),
                json!({
                    "category": category.as_str(),
                    "LastRestock": after.last_restock,
                    "countdown": after.countdown,
                }),
            ))
        })
        .collect()
}

fn value_subject(kind: FeedKind) -> &'static str {
    match kind {
        FeedKind::Stock => "Stock updated",
        FeedKind::Weather => "Weather updated",
        FeedKind::Items => "Item catalog updated",
        FeedKind::Restock => "Restock updated",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RestockEntry;

    fn restock(entries: &[(RestockCategory, i64)]) -> RestockState {
        entries
            .iter()
            .map(|(c, t)| {
                (
                    *c,
                    RestockEntry {
                        last_restock: *t,
                        countdown: "00h05m00s".into(),
                    },
                )
            })
            .collect()
    }

    fn all_categories(t: i64) -> RestockState {
        restock(&RestockCategory::ALL.map(|c| (c, t)))
    }

    #[test]
    fn test_no_changes() {
        let snapshot = Snapshot {
            stock: Some(json!({ "seeds": ["Carrot", "Tomato"] })),
            ..Snapshot::default()
        };
        let data = FeedData::Value(json!({ "seeds": ["Carrot", "Tomato"] }));

        let events = ChangeDetector::new().detect(FeedKind::Stock, &data, &snapshot).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_key_order_is_not_a_change() {
        let snapshot = Snapshot {
            weather: Some(json!({ "type": "rain", "active": true })),
            ..Snapshot::default()
        };
        let data = FeedData::Value(serde_json::from_str(r#"{"active": true, "type": "rain"}"#).unwrap());

        let events = ChangeDetector::new().detect(FeedKind::Weather, &data, &snapshot).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_value_change() {
        let snapshot = Snapshot {
            items: Some(json!([{ "name": "Carrot" }])),
            ..Snapshot::default()
        };
        let data = FeedData::Value(json!([{ "name": "Carrot" }, { "name": "Bamboo" }]));

        let events = ChangeDetector::new().detect(FeedKind::Items, &data, &snapshot).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].feed, FeedKind::Items);
        assert_eq!(events[0].payload[1]["name"], "Bamboo");
    }

    #[test]
    fn test_first_observation_notifies_by_default() {
        let data = FeedData::Value(json!({ "seeds": [] }));
        let events = ChangeDetector::new()
            .detect(FeedKind::Stock, &data, &Snapshot::default())
            .unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_first_observation_baseline_mode() {
        let data = FeedData::Value(json!({ "seeds": [] }));
        let events = ChangeDetector::baseline_first()
            .detect(FeedKind::Stock, &data, &Snapshot::default())
            .unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_baseline_mode_applies_to_any_empty_slot() {
        // Stock already known, weather never observed
        let snapshot = Snapshot {
            stock: Some(json!({ "seeds": ["Carrot"] })),
            ..Snapshot::default()
        };
        let detector = ChangeDetector::with_first_observation(false);

        let weather = FeedData::Value(json!({ "type": "rain" }));
        assert!(detector.detect(FeedKind::Weather, &weather, &snapshot).unwrap().is_empty());

        let stock = FeedData::Value(json!({ "seeds": ["Bamboo"] }));
        assert_eq!(detector.detect(FeedKind::Stock, &stock, &snapshot).unwrap().len(), 1);
    }

    #[test]
    fn test_null_against_absent_is_not_a_change() {
        let events = ChangeDetector::new()
            .detect(FeedKind::Weather, &FeedData::Value(Value::Null), &Snapshot::default())
            .unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_restock_without_prior_is_baseline() {
        let data = FeedData::Restock(all_categories(1_000));
        let events = ChangeDetector::new()
            .detect(FeedKind::Restock, &data, &Snapshot::default())
            .unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_restock_single_category_change() {
        let snapshot = Snapshot {
            restock: Some(all_categories(1_000)),
            ..Snapshot::default()
        };
        let mut current = all_categories(1_000);
        current.insert(
            RestockCategory::Egg,
            RestockEntry {
                last_restock: 2_000,
                countdown: "00h30m00s".into(),
            },
        );

        let events = ChangeDetector::new()
            .detect(FeedKind::Restock, &FeedData::Restock(current), &snapshot)
            .unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].subject.contains("egg"));
        assert_eq!(events[0].payload["LastRestock"], 2_000);
    }

    #[test]
    fn test_restock_countdown_alone_is_not_a_change() {
        let snapshot = Snapshot {
            restock: Some(all_categories(1_000)),
            ..Snapshot::default()
        };
        let mut current = all_categories(1_000);
        for entry in current.values_mut() {
            entry.countdown = "00h00m01s".into();
        }

        let events = ChangeDetector::new()
            .detect(FeedKind::Restock, &FeedData::Restock(current), &snapshot)
            .unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_restock_category_without_prior_entry_is_skipped() {
        let previous = restock(&[(RestockCategory::Gear, 1_000)]);
        let current = restock(&[(RestockCategory::Gear, 1_000), (RestockCategory::Seeds, 5_000)]);

        let events = detect_restock(&current, Some(&previous));
        assert!(events.is_empty());
    }
}
