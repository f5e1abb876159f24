// src/utils/hash.rs

//! Stable content hashing for feed payloads.

use std::collections::BTreeMap;

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Rebuild a JSON value with object keys in sorted order at every level.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&String, Value> =
                map.iter().map(|(k, v)| (k, canonicalize(v))).collect();
            Value::Object(sorted.into_iter().map(|(k, v)| (k.clone(), v)).collect())
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// Hex SHA-256 of the canonical serialization of `value`.
///
/// Absent values and JSON `null` both hash to `None`, so they compare equal.
pub fn content_hash(value: Option<&Value>) -> Option<String> {
    let value = value.filter(|v| !v.is_null())?;
    let bytes = canonicalize(value).to_string();
    let mut hasher = Sha256::new();
    hasher.update(bytes.as_bytes());
    Some(hex::encode(hasher.finalize()))
}
