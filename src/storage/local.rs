//! Local filesystem snapshot storage.
//!
//! Writes go to a sibling `.tmp` file which is then renamed over the
//! snapshot, so readers only ever see a complete document.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Snapshot;
use crate::storage::SnapshotStore;

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalSnapshotStore {
    path: PathBuf,
}

impl LocalSnapshotStore {
    /// Create a store persisting to the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl SnapshotStore for LocalSnapshotStore {
    async fn load(&self) -> Result<Snapshot> {
        match self.read_bytes().await? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => {
                log::info!("No snapshot at {}, starting empty", self.path.display());
                Ok(Snapshot::default())
            }
        }
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(snapshot).map_err(AppError::persistence)?;
        self.write_bytes(&bytes).await.map_err(|e| {
            AppError::persistence(format!("writing {}: {}", self.path.display(), e))
        })?;
        log::debug!("Snapshot written to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RestockCategory, RestockEntry, RestockState};
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_snapshot() -> Snapshot {
        let mut restock = RestockState::new();
        restock.insert(
            RestockCategory::Egg,
            RestockEntry {
                last_restock: 1_700_000_000_000,
                countdown: "00h12m00s".into(),
            },
        );
        Snapshot {
            stock: Some(json!({ "seeds": [{ "name": "Carrot", "value": 12 }] })),
            weather: None,
            restock: Some(restock),
            items: Some(json!([{ "name": "Watering Can" }])),
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_snapshot() {
        let tmp = TempDir::new().unwrap();
        let store = LocalSnapshotStore::new(tmp.path().join("snapshot.json"));

        let snapshot = store.load().await.unwrap();
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = LocalSnapshotStore::new(tmp.path().join("nested/dir/snapshot.json"));
        let snapshot = sample_snapshot();

        store.save(&snapshot).await.unwrap();
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded, snapshot);
        assert!(!store.path().with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_written_file_is_pretty_with_four_fields() {
        let tmp = TempDir::new().unwrap();
        let store = LocalSnapshotStore::new(tmp.path().join("snapshot.json"));
        store.save(&sample_snapshot()).await.unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 4);
        assert!(obj["weather"].is_null());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("snapshot.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let store = LocalSnapshotStore::new(path);
        assert!(store.load().await.is_err());
    }

    #[tokio::test]
    async fn test_unwritable_location_is_persistence_error() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        // Parent "directory" is a regular file
        let store = LocalSnapshotStore::new(blocker.join("snapshot.json"));
        let err = store.save(&Snapshot::default()).await.unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)));
    }
}
