use super::KvBackend;
use crate::{CollectionId, Error, Result};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::Path;

/// Ordered in-memory map holding one collection.
///
/// Used by tests and by tooling that needs the store shape without a disk.
pub struct InMemBackend {
    id: CollectionId,
    entries: RwLock<Option<BTreeMap<Vec<u8>, Vec<u8>>>>,
}

impl InMemBackend {
    pub fn new(id: CollectionId) -> Self {
        Self {
            id,
            entries: RwLock::new(Some(BTreeMap::new())),
        }
    }
}

impl KvBackend for InMemBackend {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let guard = self.entries.read();
        let entries = guard.as_ref().ok_or(Error::Closed(self.id))?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let mut guard = self.entries.write();
        let entries = guard.as_mut().ok_or(Error::Closed(self.id))?;
        entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        let mut guard = self.entries.write();
        let entries = guard.as_mut().ok_or(Error::Closed(self.id))?;
        entries.remove(key);
        Ok(())
    }

    fn for_each(&self, visit: &mut dyn FnMut(&[u8], &[u8]) -> bool) -> Result<()> {
        let guard = self.entries.read();
        let entries = guard.as_ref().ok_or(Error::Closed(self.id))?;
        for (key, value) in entries {
            if !visit(key, value) {
                break;
            }
        }
        Ok(())
    }

    fn close(&self) -> Result<()> {
        self.entries
            .write()
            .take()
            .map(|_| ())
            .ok_or(Error::Closed(self.id))
    }

    fn checkpoint(&self, _dest: &Path) -> Result<()> {
        Err(Error::SnapshotUnsupported(self.id))
    }
}
