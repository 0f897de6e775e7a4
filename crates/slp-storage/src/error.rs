//! Error types for the store.

use crate::CollectionId;
use std::fmt;
use std::path::PathBuf;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required key was empty or malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The key does not exist in the collection.
    #[error("Key {key:?} not found in {collection}")]
    NotFound { collection: CollectionId, key: String },

    /// RocksDB error.
    #[error("RocksDB error: {0}")]
    Rocksdb(#[from] rocksdb::Error),

    /// A stored value could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The collection has already been closed.
    #[error("Collection {0} is closed")]
    Closed(CollectionId),

    /// The blocking task running a store operation failed.
    #[error("Store task failed: {0}")]
    Task(String),

    /// The collection backend cannot produce on-disk snapshots.
    #[error("Collection {0} does not support snapshots")]
    SnapshotUnsupported(CollectionId),

    /// Snapshots are never written over an existing path.
    #[error("Snapshot destination {0} already exists")]
    SnapshotExists(PathBuf),

    /// A snapshot being restored lacks one of the collections.
    #[error("Snapshot at {path} is missing collection {collection}")]
    SnapshotIncomplete { path: PathBuf, collection: CollectionId },

    /// Restoring would overwrite live data.
    #[error("Refusing to restore into non-empty {0}")]
    RestoreTargetNotEmpty(PathBuf),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

/// One or more collections failed to close cleanly.
///
/// Every collection is still attempted; each failure is listed here.
#[derive(Debug)]
pub struct CloseError {
    pub failed: Vec<(CollectionId, Error)>,
}

impl CloseError {
    /// Names of the collections that failed to close, in close order.
    pub fn failed_collections(&self) -> Vec<CollectionId> {
        self.failed.iter().map(|(id, _)| *id).collect()
    }
}

impl fmt::Display for CloseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to close {} collection(s):", self.failed.len())?;
        for (id, err) in &self.failed {
            write!(f, " [{id}: {err}]")?;
        }
        Ok(())
    }
}

impl std::error::Error for CloseError {}
