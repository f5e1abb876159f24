//! Last-known state of every feed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::models::{FeedData, FeedKind, RestockState};

/// The persisted snapshot.
///
/// Each field holds the last successfully observed value for its feed, or
/// `None` if the feed was never observed. All four keys are always written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub stock: Option<Value>,
    #[serde(default)]
    pub weather: Option<Value>,
    #[serde(default)]
    pub restock: Option<RestockState>,
    #[serde(default)]
    pub items: Option<Value>,
}

impl Snapshot {
    /// Whether no feed has ever been observed.
    pub fn is_empty(&self) -> bool {
        self.stock.is_none() && self.weather.is_none() && self.restock.is_none() && self.items.is_none()
    }

    /// Opaque value stored for a non-restock feed.
    pub fn value(&self, kind: FeedKind) -> Option<&Value> {
        match kind {
            FeedKind::Stock => self.stock.as_ref(),
            FeedKind::Weather => self.weather.as_ref(),
            FeedKind::Items => self.items.as_ref(),
            FeedKind::Restock => None,
        }
    }

    /// Stage newly fetched data into this snapshot.
    ///
    /// JSON `null` is stored as absent, matching how it reads back from disk.
    pub fn stage(&mut self, kind: FeedKind, data: FeedData) -> Result<()> {
        match kind {
            FeedKind::Stock => self.stock = present(data.into_value()?),
            FeedKind::Weather => self.weather = present(data.into_value()?),
            FeedKind::Items => self.items = present(data.into_value()?),
            FeedKind::Restock => self.restock = Some(data.into_restock()?),
        }
        Ok(())
    }
}

fn present(value: Value) -> Option<Value> {
    Some(value).filter(|v| !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_serializes_all_fields() {
        let json = serde_json::to_value(Snapshot::default()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 4);
        assert!(obj.values().all(Value::is_null));
    }

    #[test]
    fn test_missing_fields_deserialize_as_absent() {
        let snapshot: Snapshot = serde_json::from_str(r#"{ "stock": [1, 2] }"#).unwrap();
        assert_eq!(snapshot.stock, Some(json!([1, 2])));
        assert!(snapshot.weather.is_none());
        assert!(snapshot.restock.is_none());
    }

    #[test]
    fn test_stage_replaces_value() {
        let mut snapshot = Snapshot::default();
        snapshot
            .stage(FeedKind::Weather, FeedData::Value(json!({ "rain": true })))
            .unwrap();
        assert_eq!(snapshot.value(FeedKind::Weather), Some(&json!({ "rain": true })));
        assert!(!snapshot.is_empty());
    }

    #[test]
    fn test_stage_null_is_absent() {
        let mut snapshot = Snapshot {
            items: Some(json!(["Trowel"])),
            ..Snapshot::default()
        };
        snapshot
            .stage(FeedKind::Items, FeedData::Value(Value::Null))
            .unwrap();
        assert!(snapshot.items.is_none());

        let reloaded: Snapshot =
            serde_json::from_str(&serde_json::to_string(&snapshot).unwrap()).unwrap();
        assert_eq!(reloaded, snapshot);
    }
}
