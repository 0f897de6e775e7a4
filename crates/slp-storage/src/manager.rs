use crate::backend::{InMemBackend, KvBackend, RocksDbBackend};
use crate::collection::Collection;
use crate::error::CloseError;
use crate::record::Record;
use crate::{CollectionId, Error, Result};
use slp_primitives::{
    AddressRecord, PinClaim, ProcessedTx, SyncStatus, TokenRecord, TxRecord, UtxoEntry,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Block cache given to each of the hot collections.
pub const DEFAULT_HOT_CACHE_SIZE: usize = 1 << 30;

/// Store location and tuning.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Root directory; each collection lives in a subdirectory named after it.
    pub path: PathBuf,
    /// Block cache size in bytes for the address and transaction collections.
    pub hot_cache_size: usize,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            hot_cache_size: DEFAULT_HOT_CACHE_SIZE,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new("./leveldb/current")
    }
}

/// Owns the seven collections for the lifetime of the process.
///
/// Collection handles obtained from the manager stay valid until
/// [`StoreManager::close_all`] runs, after which every operation on them fails
/// with [`Error::Closed`].
pub struct StoreManager {
    root: Option<PathBuf>,
    /// Indexed by [`CollectionId`] discriminant.
    backends: Vec<Arc<dyn KvBackend>>,
}

impl StoreManager {
    /// Open (creating if missing) every collection under `config.path`.
    ///
    /// Any collection failing to open aborts startup.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.path)?;

        let manager = Self::from_backends(Some(config.path.clone()), |id| {
            let cache_size = id.is_hot().then_some(config.hot_cache_size);
            let backend = RocksDbBackend::open(id, &config.path.join(id.dir_name()), cache_size)?;
            Ok(Arc::new(backend) as Arc<dyn KvBackend>)
        })?;

        tracing::info!("📦 Opened store at {}", config.path.display());

        Ok(manager)
    }

    /// Store with every collection held in memory.
    pub fn open_in_memory() -> Self {
        Self {
            root: None,
            backends: CollectionId::ALL
                .into_iter()
                .map(|id| Arc::new(InMemBackend::new(id)) as Arc<dyn KvBackend>)
                .collect(),
        }
    }

    /// Build a store from caller-provided engines, one per collection in
    /// [`CollectionId::ALL`] order.
    pub fn from_backends(
        root: Option<PathBuf>,
        factory: impl FnMut(CollectionId) -> Result<Arc<dyn KvBackend>>,
    ) -> Result<Self> {
        let backends = CollectionId::ALL
            .into_iter()
            .map(factory)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { root, backends })
    }

    /// Root directory of an on-disk store.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn collection<V: Record>(&self) -> Collection<V> {
        Collection::new(Arc::clone(&self.backends[V::COLLECTION.index()]))
    }

    pub fn addresses(&self) -> Collection<AddressRecord> {
        self.collection()
    }

    pub fn transactions(&self) -> Collection<TxRecord> {
        self.collection()
    }

    pub fn tokens(&self) -> Collection<TokenRecord> {
        self.collection()
    }

    pub fn status(&self) -> Collection<SyncStatus> {
        self.collection()
    }

    pub fn processed_txs(&self) -> Collection<ProcessedTx> {
        self.collection()
    }

    pub fn utxos(&self) -> Collection<UtxoEntry> {
        self.collection()
    }

    pub fn pin_claims(&self) -> Collection<PinClaim> {
        self.collection()
    }

    /// Flush and close every collection.
    ///
    /// A failing collection does not stop the others from being closed. Calling
    /// this twice reports every collection as already closed.
    pub fn close_all(&self) -> std::result::Result<(), CloseError> {
        let mut failed = Vec::new();

        for id in CollectionId::ALL {
            if let Err(err) = self.backends[id.index()].close() {
                tracing::error!("Failed to close collection {id}: {err}");
                failed.push((id, err));
            }
        }

        if failed.is_empty() {
            tracing::info!("All collections closed");
            Ok(())
        } else {
            Err(CloseError { failed })
        }
    }

    /// Write a checkpoint of every collection into `dest/<collection>`.
    ///
    /// `dest` must not exist or be an empty directory. Each collection is
    /// checkpointed on its own, so writes landing during the backup may be present
    /// in some collections and not in others.
    pub fn backup(&self, dest: &Path) -> Result<()> {
        if !is_missing_or_empty(dest)? {
            return Err(Error::SnapshotExists(dest.to_path_buf()));
        }
        let created_dest = !dest.exists();
        std::fs::create_dir_all(dest)?;

        if let Err(err) = self.checkpoint_all(dest) {
            discard_partial_backup(dest, created_dest);
            return Err(err);
        }

        tracing::info!("💾 Store backup written to {}", dest.display());

        Ok(())
    }

    fn checkpoint_all(&self, dest: &Path) -> Result<()> {
        for id in CollectionId::ALL {
            self.backends[id.index()].checkpoint(&dest.join(id.dir_name()))?;
            tracing::debug!("Checkpointed collection {id}");
        }
        Ok(())
    }

    /// Copy a snapshot produced by [`StoreManager::backup`] into `root`.
    ///
    /// Must run while no store is open at `root`. Refuses to overwrite existing
    /// data.
    pub fn restore(snapshot: &Path, root: &Path) -> Result<()> {
        for id in CollectionId::ALL {
            if !snapshot.join(id.dir_name()).is_dir() {
                return Err(Error::SnapshotIncomplete {
                    path: snapshot.to_path_buf(),
                    collection: id,
                });
            }
        }

        if !is_missing_or_empty(root)? {
            return Err(Error::RestoreTargetNotEmpty(root.to_path_buf()));
        }
        std::fs::create_dir_all(root)?;

        for id in CollectionId::ALL {
            copy_dir_all(&snapshot.join(id.dir_name()), &root.join(id.dir_name()))?;
        }

        tracing::info!(
            "Restored store at {} from {}",
            root.display(),
            snapshot.display()
        );

        Ok(())
    }
}

/// Remove the checkpoints of a failed backup so `dest` is left as it was found.
fn discard_partial_backup(dest: &Path, created_dest: bool) {
    for id in CollectionId::ALL {
        let dir = dest.join(id.dir_name());
        if dir.exists() {
            if let Err(err) = std::fs::remove_dir_all(&dir) {
                tracing::warn!("Failed to remove partial checkpoint {}: {err}", dir.display());
            }
        }
    }
    if created_dest {
        if let Err(err) = std::fs::remove_dir(dest) {
            tracing::warn!("Failed to remove backup directory {}: {err}", dest.display());
        }
    }
}

fn is_missing_or_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    Ok(path.is_dir() && std::fs::read_dir(path)?.next().is_none())
}

fn copy_dir_all(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_all(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use slp_primitives::{STATUS_KEY, TokenAmount, TokenStats};

    /// Closes its inner engine, then reports a failure.
    struct FailOnClose(InMemBackend);

    impl KvBackend for FailOnClose {
        fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
            self.0.get(key)
        }

        fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
            self.0.put(key, value)
        }

        fn delete(&self, key: &[u8]) -> Result<()> {
            self.0.delete(key)
        }

        fn for_each(&self, visit: &mut dyn FnMut(&[u8], &[u8]) -> bool) -> Result<()> {
            self.0.for_each(visit)
        }

        fn close(&self) -> Result<()> {
            self.0.close()?;
            Err(Error::Io(std::io::Error::other("flush failed")))
        }

        fn checkpoint(&self, dest: &Path) -> Result<()> {
            self.0.checkpoint(dest)
        }
    }

    fn token(id: &str) -> TokenRecord {
        TokenRecord {
            stats: TokenStats {
                token_id: id.into(),
                ticker: "TKA".into(),
                name: "Token A".into(),
                decimals: 2,
                token_type: 1,
                document_uri: None,
                document_hash: None,
                total_minted: TokenAmount(1_000),
                total_burned: TokenAmount(0),
            },
            txs: vec!["genesis".into()],
        }
    }

    fn status(synced: u32) -> SyncStatus {
        SyncStatus {
            start_block_height: 100,
            synced_block_height: synced,
            chain_block_height: synced + 1,
        }
    }

    #[tokio::test]
    async fn test_close_all_reports_failed_collection_and_closes_the_rest() {
        let manager = StoreManager::from_backends(None, |id| {
            let backend: Arc<dyn KvBackend> = if id == CollectionId::Status {
                Arc::new(FailOnClose(InMemBackend::new(id)))
            } else {
                Arc::new(InMemBackend::new(id))
            };
            Ok(backend)
        })
        .unwrap();

        let tokens = manager.tokens();
        tokens.put("token-a", &token("token-a")).await.unwrap();

        let err = manager.close_all().unwrap_err();
        assert_eq!(err.failed_collections(), vec![CollectionId::Status]);
        assert!(err.to_string().contains("status"));

        // Collections after the failing one were still closed.
        for id in CollectionId::ALL {
            assert!(matches!(
                manager.backends[id.index()].close(),
                Err(Error::Closed(closed)) if closed == id
            ));
        }
        assert!(matches!(
            tokens.get("token-a").await.unwrap_err(),
            Error::Closed(CollectionId::Token)
        ));
    }

    #[tokio::test]
    async fn test_close_all_twice() {
        let manager = StoreManager::open_in_memory();
        manager.close_all().unwrap();

        let err = manager.close_all().unwrap_err();
        assert_eq!(err.failed_collections(), CollectionId::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let manager = StoreManager::open_in_memory();
        manager.tokens().put("shared", &token("shared")).await.unwrap();

        assert!(manager.addresses().get("shared").await.unwrap_err().is_not_found());
        assert!(manager.transactions().get("shared").await.unwrap_err().is_not_found());
        assert!(manager.tokens().contains("shared").await.unwrap());
    }

    #[tokio::test]
    async fn test_rocksdb_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            path: dir.path().join("current"),
            hot_cache_size: 8 << 20,
        };

        let manager = StoreManager::open(&config).unwrap();
        for id in CollectionId::ALL {
            assert!(config.path.join(id.dir_name()).is_dir());
        }
        manager.tokens().put("token-a", &token("token-a")).await.unwrap();
        manager.status().put_status(&status(500)).await.unwrap();
        manager.close_all().unwrap();

        let reopened = StoreManager::open(&config).unwrap();
        assert_eq!(
            reopened.tokens().get("token-a").await.unwrap(),
            token("token-a")
        );
        assert_eq!(reopened.status().get(STATUS_KEY).await.unwrap(), status(500));
        reopened.close_all().unwrap();
    }

    #[tokio::test]
    async fn test_backup_and_restore() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            path: dir.path().join("current"),
            hot_cache_size: 8 << 20,
        };
        let snapshot = dir.path().join("backup");
        let restored = dir.path().join("restored");

        let manager = StoreManager::open(&config).unwrap();
        manager.tokens().put("token-a", &token("token-a")).await.unwrap();
        manager.backup(&snapshot).unwrap();

        // Writes after the checkpoint are not part of it.
        manager.tokens().put("token-b", &token("token-b")).await.unwrap();

        assert!(matches!(
            manager.backup(&snapshot),
            Err(Error::SnapshotExists(_))
        ));
        manager.close_all().unwrap();

        assert!(matches!(
            StoreManager::restore(&snapshot, &config.path),
            Err(Error::RestoreTargetNotEmpty(_))
        ));

        StoreManager::restore(&snapshot, &restored).unwrap();
        let from_backup = StoreManager::open(&StoreConfig::new(&restored)).unwrap();
        assert_eq!(
            from_backup.tokens().get("token-a").await.unwrap(),
            token("token-a")
        );
        assert!(from_backup.tokens().get("token-b").await.unwrap_err().is_not_found());
        from_backup.close_all().unwrap();
    }

    #[test]
    fn test_restore_rejects_incomplete_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("partial");
        std::fs::create_dir_all(snapshot.join("addrs")).unwrap();

        match StoreManager::restore(&snapshot, &dir.path().join("target")) {
            Err(Error::SnapshotIncomplete { collection, .. }) => {
                assert_eq!(collection, CollectionId::Transaction)
            }
            other => panic!("Expected SnapshotIncomplete, got {other:?}"),
        }
    }

    #[test]
    fn test_in_memory_store_cannot_back_up() {
        let dir = tempfile::tempdir().unwrap();
        let manager = StoreManager::open_in_memory();
        assert!(matches!(
            manager.backup(&dir.path().join("backup")),
            Err(Error::SnapshotUnsupported(CollectionId::Address))
        ));
    }

    /// Address, Transaction and Token on disk; the rest cannot be checkpointed.
    fn partially_snapshottable_store(root: &Path) -> StoreManager {
        StoreManager::from_backends(Some(root.to_path_buf()), |id| {
            let backend: Arc<dyn KvBackend> = match id {
                CollectionId::Address | CollectionId::Transaction | CollectionId::Token => {
                    Arc::new(RocksDbBackend::open(id, &root.join(id.dir_name()), None)?)
                }
                _ => Arc::new(InMemBackend::new(id)),
            };
            Ok(backend)
        })
        .unwrap()
    }

    #[test]
    fn test_failed_backup_leaves_destination_clean() {
        let dir = tempfile::tempdir().unwrap();
        let manager = partially_snapshottable_store(&dir.path().join("current"));

        // Pre-existing empty destination stays, emptied.
        let dest = dir.path().join("backup");
        std::fs::create_dir_all(&dest).unwrap();
        assert!(matches!(
            manager.backup(&dest),
            Err(Error::SnapshotUnsupported(CollectionId::Status))
        ));
        assert!(dest.is_dir());
        assert_eq!(std::fs::read_dir(&dest).unwrap().count(), 0);

        // Retrying hits the same failure, not a leftover snapshot.
        assert!(matches!(
            manager.backup(&dest),
            Err(Error::SnapshotUnsupported(CollectionId::Status))
        ));

        // A destination created by the call is removed again.
        let fresh = dir.path().join("fresh");
        assert!(manager.backup(&fresh).is_err());
        assert!(!fresh.exists());

        manager.close_all().unwrap();
    }
}
