//! Cart Snapshots
//!
//! Local persistence for the cart so it survives restarts.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::CartItem;

/// Snapshot format version. Snapshots written with another version are
/// discarded on load.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Persisted cart contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    pub version: u32,
}

impl CartSnapshot {
    /// Snapshot of `items` at the current format version.
    pub fn new(items: Vec<CartItem>) -> Self {
        Self {
            items,
            version: SNAPSHOT_VERSION,
        }
    }

    /// Items, if the snapshot was written with the current format version.
    pub fn into_current(self) -> Option<Vec<CartItem>> {
        (self.version == SNAPSHOT_VERSION).then_some(self.items)
    }
}

/// Storage for cart snapshots.
pub trait SnapshotStore: Send + Sync {
    /// Load the last saved snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if storage exists but cannot be read or decoded.
    fn load(&self) -> Result<Option<CartSnapshot>, SnapshotError>;

    /// Replace the saved snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    fn save(&self, snapshot: &CartSnapshot) -> Result<(), SnapshotError>;
}

/// Snapshot store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    /// Store snapshots at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File the snapshot lives in.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<Option<CartSnapshot>, SnapshotError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn save(&self, snapshot: &CartSnapshot) -> Result<(), SnapshotError> {
        let staging = self.path.with_extension("tmp");

        fs::write(&staging, serde_json::to_vec(snapshot)?)?;
        fs::rename(&staging, &self.path)?;

        Ok(())
    }
}

/// Snapshot store kept in memory, for tests and headless sessions.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    snapshot: Mutex<Option<CartSnapshot>>,
}

impl MemorySnapshotStore {
    /// Store seeded with an existing snapshot.
    pub fn with_snapshot(snapshot: CartSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot)),
        }
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Result<Option<CartSnapshot>, SnapshotError> {
        let guard = self.snapshot.lock().map_err(|error| SnapshotError::Poisoned(error.to_string()))?;

        Ok(guard.clone())
    }

    fn save(&self, snapshot: &CartSnapshot) -> Result<(), SnapshotError> {
        let mut guard = self.snapshot.lock().map_err(|error| SnapshotError::Poisoned(error.to_string()))?;

        *guard = Some(snapshot.clone());

        Ok(())
    }
}

/// Errors reading or writing snapshots.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Filesystem failure.
    #[error("snapshot io error: {0}")]
    Io(#[from] io::Error),

    /// Stored snapshot is not valid JSON for the snapshot format.
    #[error("snapshot decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// A writer panicked while holding the snapshot lock.
    #[error("snapshot lock poisoned: {0}")]
    Poisoned(String),
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::cart::fixtures::item;

    #[test]
    fn poisoned_memory_store_reports_the_lock_error() {
        let store = MemorySnapshotStore::default();

        std::thread::scope(|scope| {
            let writer = scope.spawn(|| {
                let _guard = store.snapshot.lock();
                panic!("writer died holding the snapshot");
            });

            assert!(writer.join().is_err());
        });

        let Err(SnapshotError::Poisoned(message)) = store.load() else {
            panic!("expected a poisoned lock error");
        };

        assert!(message.contains("poisoned"), "{message}");
    }

    #[test]
    fn file_store_round_trips_and_reports_missing_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = FileSnapshotStore::new(dir.path().join("cart.json"));

        assert_eq!(store.load()?, None);

        let snapshot = CartSnapshot::new(vec![item("Still", "1L", 1_000, 2)]);
        store.save(&snapshot)?;

        assert_eq!(store.load()?, Some(snapshot));

        Ok(())
    }

    #[test]
    fn file_store_rejects_corrupt_snapshot() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("cart.json");
        fs::write(&path, b"{not json")?;

        let result = FileSnapshotStore::new(path).load();

        assert!(matches!(result, Err(SnapshotError::Json(_))), "got {result:?}");

        Ok(())
    }

    #[test]
    fn foreign_versions_are_discarded() {
        let snapshot = CartSnapshot {
            items: vec![item("Still", "1L", 1_000, 2)],
            version: SNAPSHOT_VERSION + 1,
        };

        assert_eq!(snapshot.into_current(), None);
    }
}
