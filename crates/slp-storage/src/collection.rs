//! Typed handle over a single collection.

use crate::backend::KvBackend;
use crate::record::Record;
use crate::{CollectionId, Error, Result};
use slp_primitives::{STATUS_KEY, SyncStatus, UtxoEntry, UtxoKey};
use std::marker::PhantomData;
use std::sync::Arc;

/// Shared handle to one collection.
///
/// Cloning is cheap; all clones use the same engine instance, so a write is
/// visible to every subsequent read through any clone. Each operation runs on the
/// blocking thread pool and cannot be cancelled once dispatched.
pub struct Collection<V> {
    backend: Arc<dyn KvBackend>,
    _marker: PhantomData<fn() -> V>,
}

impl<V> Clone for Collection<V> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            _marker: PhantomData,
        }
    }
}

fn checked_key<V: Record>(key: &str) -> Result<String> {
    if key.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "empty key for collection {}",
            V::COLLECTION
        )));
    }
    Ok(key.to_string())
}

impl<V: Record> Collection<V> {
    pub(crate) fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self {
            backend,
            _marker: PhantomData,
        }
    }

    pub fn id(&self) -> CollectionId {
        V::COLLECTION
    }

    /// Fetch the record stored under `key`, failing with [`Error::NotFound`] if absent.
    pub async fn get(&self, key: &str) -> Result<V> {
        self.try_get(key).await?.ok_or_else(|| Error::NotFound {
            collection: V::COLLECTION,
            key: key.to_string(),
        })
    }

    /// Fetch the record stored under `key`, if any.
    pub async fn try_get(&self, key: &str) -> Result<Option<V>> {
        let key = checked_key::<V>(key)?;
        let bytes = self
            .run(move |backend| backend.get(key.as_bytes()))
            .await?;
        bytes
            .map(|bytes| serde_json::from_slice(&bytes).map_err(Error::from))
            .transpose()
    }

    /// Insert or overwrite the record under `key`.
    pub async fn put(&self, key: &str, value: &V) -> Result<()> {
        let key = checked_key::<V>(key)?;
        let encoded = serde_json::to_vec(value)?;
        self.run(move |backend| backend.put(key.as_bytes(), &encoded))
            .await
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        let key = checked_key::<V>(key)?;
        self.run(move |backend| backend.delete(key.as_bytes()))
            .await
    }

    pub async fn contains(&self, key: &str) -> Result<bool> {
        let key = checked_key::<V>(key)?;
        self.run(move |backend| Ok(backend.get(key.as_bytes())?.is_some()))
            .await
    }

    /// Visit every record in key order until `visit` returns `false`.
    ///
    /// Returns the number of records visited. Stops at the first record that fails
    /// to decode.
    pub async fn scan<F>(&self, mut visit: F) -> Result<usize>
    where
        F: FnMut(String, V) -> bool + Send + 'static,
    {
        self.run(move |backend| {
            let mut visited = 0;
            let mut decode_error = None;
            backend.for_each(&mut |key, value| match serde_json::from_slice::<V>(value) {
                Ok(record) => {
                    visited += 1;
                    visit(String::from_utf8_lossy(key).into_owned(), record)
                }
                Err(err) => {
                    decode_error = Some(err);
                    false
                }
            })?;
            match decode_error {
                Some(err) => Err(err.into()),
                None => Ok(visited),
            }
        })
        .await
    }

    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn KvBackend) -> Result<T> + Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        tokio::task::spawn_blocking(move || op(backend.as_ref()))
            .await
            .map_err(|err| Error::Task(err.to_string()))?
    }
}

impl Collection<UtxoEntry> {
    /// Fetch the entry stored under the exact `<txid>:<vout>` key.
    pub async fn get_outpoint(&self, key: &UtxoKey) -> Result<UtxoEntry> {
        self.get(&key.to_string()).await
    }

    /// Store `entry` under the key derived from its own txid and vout.
    pub async fn insert(&self, entry: &UtxoEntry) -> Result<()> {
        self.put(&entry.key().to_string(), entry).await
    }
}

impl Collection<SyncStatus> {
    pub async fn get_status(&self) -> Result<SyncStatus> {
        self.get(STATUS_KEY).await
    }

    /// Overwrite the canonical status entry.
    ///
    /// A synced height lower than the stored one is written anyway but logged, since
    /// the crawler owns reorg handling.
    pub async fn put_status(&self, status: &SyncStatus) -> Result<()> {
        if let Some(previous) = self.try_get(STATUS_KEY).await? {
            if status.regresses(&previous) {
                tracing::warn!(
                    "Synced block height moves backwards: {} -> {}",
                    previous.synced_block_height,
                    status.synced_block_height
                );
            }
        }
        self.put(STATUS_KEY, status).await
    }

    pub async fn delete_status(&self) -> Result<()> {
        self.delete(STATUS_KEY).await
    }
}
