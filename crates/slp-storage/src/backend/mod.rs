//! Key-value engines backing a single collection.

mod in_mem;
mod rocks;

pub use in_mem::InMemBackend;
pub use rocks::RocksDbBackend;

use crate::Result;
use std::path::Path;

/// Raw byte-level access to the engine instance of one collection.
///
/// Implementations must be safe for concurrent use: any number of readers,
/// serialized writers. Once [`KvBackend::close`] has returned, every operation
/// fails with [`crate::Error::Closed`].
pub trait KvBackend: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Inserts or overwrites `key`.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn delete(&self, key: &[u8]) -> Result<()>;

    /// Visits every entry in key order until `visit` returns `false`.
    fn for_each(&self, visit: &mut dyn FnMut(&[u8], &[u8]) -> bool) -> Result<()>;

    /// Flushes pending writes and releases the engine.
    fn close(&self) -> Result<()>;

    /// Writes a consistent on-disk snapshot of the collection to `dest`.
    fn checkpoint(&self, dest: &Path) -> Result<()>;
}
