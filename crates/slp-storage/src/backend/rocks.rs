use super::KvBackend;
use crate::{CollectionId, Error, Result};
use parking_lot::RwLock;
use rocksdb::checkpoint::Checkpoint;
use rocksdb::{BlockBasedOptions, Cache, DB, IteratorMode, Options};
use std::path::{Path, PathBuf};

/// RocksDB instance holding one collection.
pub struct RocksDbBackend {
    id: CollectionId,
    path: PathBuf,
    /// `None` once closed.
    db: RwLock<Option<DB>>,
}

impl RocksDbBackend {
    /// Open or create the collection at `path`.
    ///
    /// `block_cache_size` sets a dedicated LRU block cache for collections on the
    /// hot path; `None` keeps the engine default.
    pub fn open(id: CollectionId, path: &Path, block_cache_size: Option<usize>) -> Result<Self> {
        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.set_compression_type(rocksdb::DBCompressionType::Lz4);

        if let Some(cache_size) = block_cache_size {
            let cache = Cache::new_lru_cache(cache_size);
            let mut block_opts = BlockBasedOptions::default();
            block_opts.set_block_cache(&cache);
            block_opts.set_bloom_filter(10.0, false);
            db_opts.set_block_based_table_factory(&block_opts);
        }

        let db = DB::open(&db_opts, path)?;

        tracing::debug!(
            "Opened collection {id} at {} (block cache: {block_cache_size:?})",
            path.display()
        );

        Ok(Self {
            id,
            path: path.to_path_buf(),
            db: RwLock::new(Some(db)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn with_db<T>(&self, f: impl FnOnce(&DB) -> Result<T>) -> Result<T> {
        let guard = self.db.read();
        let db = guard.as_ref().ok_or(Error::Closed(self.id))?;
        f(db)
    }
}

impl KvBackend for RocksDbBackend {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.with_db(|db| Ok(db.get(key)?))
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.with_db(|db| Ok(db.put(key, value)?))
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        self.with_db(|db| Ok(db.delete(key)?))
    }

    fn for_each(&self, visit: &mut dyn FnMut(&[u8], &[u8]) -> bool) -> Result<()> {
        self.with_db(|db| {
            for item in db.iterator(IteratorMode::Start) {
                let (key, value) = item?;
                if !visit(&key, &value) {
                    break;
                }
            }
            Ok(())
        })
    }

    fn close(&self) -> Result<()> {
        let db = self.db.write().take().ok_or(Error::Closed(self.id))?;
        // The engine is released when `db` drops, whether or not the flush succeeds.
        db.flush()?;
        tracing::debug!("Closed collection {} at {}", self.id, self.path.display());
        Ok(())
    }

    fn checkpoint(&self, dest: &Path) -> Result<()> {
        self.with_db(|db| {
            let checkpoint = Checkpoint::new(db)?;
            checkpoint.create_checkpoint(dest)?;
            Ok(())
        })
    }
}
