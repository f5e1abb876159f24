//! Restock schedule types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A fixed item grouping tracked for timed restock events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RestockCategory {
    #[serde(rename = "egg")]
    Egg,
    #[serde(rename = "gear")]
    Gear,
    #[serde(rename = "seeds")]
    Seeds,
    #[serde(rename = "cosmetic")]
    Cosmetic,
    #[serde(rename = "SwarmEvent")]
    SwarmEvent,
}

impl RestockCategory {
    /// The fixed category set, in notification order.
    pub const ALL: [RestockCategory; 5] = [
        RestockCategory::Egg,
        RestockCategory::Gear,
        RestockCategory::Seeds,
        RestockCategory::Cosmetic,
        RestockCategory::SwarmEvent,
    ];

    /// Wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            RestockCategory::Egg => "egg",
            RestockCategory::Gear => "gear",
            RestockCategory::Seeds => "seeds",
            RestockCategory::Cosmetic => "cosmetic",
            RestockCategory::SwarmEvent => "SwarmEvent",
        }
    }
}

impl fmt::Display for RestockCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Restock timing for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestockEntry {
    /// Epoch milliseconds of the most recent restock
    #[serde(rename = "LastRestock")]
    pub last_restock: i64,

    /// Time remaining until the next restock (informational only)
    pub countdown: String,
}

/// Restock timing for every observed category.
pub type RestockState = BTreeMap<RestockCategory, RestockEntry>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        let mut state = RestockState::new();
        state.insert(
            RestockCategory::SwarmEvent,
            RestockEntry {
                last_restock: 42,
                countdown: "00h59m00s".into(),
            },
        );

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["SwarmEvent"]["LastRestock"], 42);
        assert_eq!(json["SwarmEvent"]["countdown"], "00h59m00s");
    }
}
