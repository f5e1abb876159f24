//! Storage abstractions for snapshot persistence.
//!
//! The snapshot is a single pretty-printed JSON document:
//!
//! ```text
//! {
//!   "stock": { ... } | null,
//!   "weather": { ... } | null,
//!   "restock": { "egg": { "LastRestock": 0, "countdown": "00h00m00s" }, ... } | null,
//!   "items": [ ... ] | null
//! }
//! ```

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Snapshot;

// Re-export for convenience
pub use local::LocalSnapshotStore;

/// Trait for snapshot storage backends.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the persisted snapshot. A missing snapshot is the empty snapshot.
    async fn load(&self) -> Result<Snapshot>;

    /// Atomically replace the persisted snapshot.
    async fn save(&self, snapshot: &Snapshot) -> Result<()>;
}
