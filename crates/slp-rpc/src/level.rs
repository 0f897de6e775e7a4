//! Raw CRUD over the store collections.

use crate::error::{Error, Result};
use jsonrpsee::proc_macros::rpc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use slp_primitives::{
    AddressRecord, PinClaim, ProcessedTx, STATUS_KEY, SyncStatus, TokenRecord, TxRecord,
    UtxoEntry, UtxoKey,
};
use slp_storage::{CollectionId, Record, StoreManager};
use std::path::PathBuf;
use std::sync::Arc;

/// Acknowledges a write or delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteAck {
    pub key: String,
    pub success: bool,
}

/// Acknowledges a completed backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupAck {
    pub path: PathBuf,
    pub success: bool,
}

/// Store maintenance API.
///
/// `collection` is one of `addr`, `tx`, `token`, `status`, `ptx`, `utxo`, `pinclaim`.
/// The status collection holds a single entry; its key may be omitted.
#[rpc(server)]
pub trait LevelApi {
    /// Store `value` under `key`, overwriting any existing record.
    #[method(name = "level_create")]
    async fn create_entry(
        &self,
        collection: CollectionId,
        key: Option<String>,
        value: Value,
    ) -> Result<WriteAck>;

    /// Same as `level_create`.
    #[method(name = "level_update")]
    async fn update_entry(
        &self,
        collection: CollectionId,
        key: Option<String>,
        value: Value,
    ) -> Result<WriteAck>;

    #[method(name = "level_get")]
    async fn get_entry(&self, collection: CollectionId, key: Option<String>) -> Result<Value>;

    #[method(name = "level_delete")]
    async fn delete_entry(
        &self,
        collection: CollectionId,
        key: Option<String>,
    ) -> Result<WriteAck>;

    /// Checkpoint every collection into `dest`, which must not hold any data.
    #[method(name = "level_backup")]
    async fn backup(&self, dest: PathBuf) -> Result<BackupAck>;
}

/// This struct provides the Level API.
pub struct Level {
    store: Arc<StoreManager>,
}

impl Level {
    /// Constructs a new instance of [`Level`].
    pub fn new(store: Arc<StoreManager>) -> Self {
        Self { store }
    }

    async fn write(
        &self,
        collection: CollectionId,
        key: Option<String>,
        value: Value,
    ) -> Result<WriteAck> {
        let key = resolve_key(collection, key)?;

        match collection {
            CollectionId::Address => self.put::<AddressRecord>(&key, value).await?,
            CollectionId::Transaction => self.put::<TxRecord>(&key, value).await?,
            CollectionId::Token => {
                let record = decode::<TokenRecord>(value)?;
                let burn_state = record.burn_state();
                if burn_state.is_anomaly() {
                    tracing::warn!(
                        token_id = %record.stats.token_id,
                        "Token burn anomaly: {burn_state:?} (minted {}, burned {})",
                        record.stats.total_minted,
                        record.stats.total_burned,
                    );
                }
                self.store.tokens().put(&key, &record).await?;
            }
            CollectionId::Status => {
                let status = decode::<SyncStatus>(value)?;
                self.store.status().put_status(&status).await?;
            }
            CollectionId::ProcessedTx => self.put::<ProcessedTx>(&key, value).await?,
            CollectionId::Utxo => {
                let entry = decode::<UtxoEntry>(value)?;
                let outpoint = key
                    .parse::<UtxoKey>()
                    .map_err(|err| Error::InvalidArgument(err.to_string()))?;
                if outpoint != entry.key() {
                    return Err(Error::InvalidArgument(format!(
                        "UTXO key {key} does not match entry {}",
                        entry.key()
                    )));
                }
                self.store.utxos().insert(&entry).await?;
            }
            CollectionId::PinClaim => self.put::<PinClaim>(&key, value).await?,
        }

        tracing::debug!("Stored {collection} entry {key}");

        Ok(WriteAck { key, success: true })
    }

    async fn put<V: Record>(&self, key: &str, value: Value) -> Result<()> {
        let record = decode::<V>(value)?;
        Ok(self.store.collection::<V>().put(key, &record).await?)
    }

    async fn fetch<V: Record>(&self, key: &str) -> Result<Value> {
        let record = self.store.collection::<V>().get(key).await?;
        serde_json::to_value(record).map_err(|err| Error::Other(err.to_string()))
    }

    async fn remove<V: Record>(&self, key: &str) -> Result<()> {
        Ok(self.store.collection::<V>().delete(key).await?)
    }
}

/// Status lives under one fixed key; every other collection needs an explicit key.
fn resolve_key(collection: CollectionId, key: Option<String>) -> Result<String> {
    match (collection, key) {
        (CollectionId::Status, None) => Ok(STATUS_KEY.to_string()),
        (CollectionId::Status, Some(key)) if key.is_empty() || key == STATUS_KEY => {
            Ok(STATUS_KEY.to_string())
        }
        (CollectionId::Status, Some(key)) => Err(Error::InvalidArgument(format!(
            "status is stored under {STATUS_KEY:?}, got {key:?}"
        ))),
        (_, Some(key)) if !key.is_empty() => Ok(key),
        (collection, _) => Err(Error::InvalidArgument(format!(
            "key required for collection {}",
            collection.short_name()
        ))),
    }
}

fn decode<V: Record>(value: Value) -> Result<V> {
    serde_json::from_value(value).map_err(|err| {
        Error::InvalidArgument(format!(
            "invalid {} record: {err}",
            V::COLLECTION.short_name()
        ))
    })
}

#[async_trait::async_trait]
impl LevelApiServer for Level {
    async fn create_entry(
        &self,
        collection: CollectionId,
        key: Option<String>,
        value: Value,
    ) -> Result<WriteAck> {
        self.write(collection, key, value).await
    }

    async fn update_entry(
        &self,
        collection: CollectionId,
        key: Option<String>,
        value: Value,
    ) -> Result<WriteAck> {
        self.write(collection, key, value).await
    }

    async fn get_entry(&self, collection: CollectionId, key: Option<String>) -> Result<Value> {
        let key = resolve_key(collection, key)?;

        match collection {
            CollectionId::Address => self.fetch::<AddressRecord>(&key).await,
            CollectionId::Transaction => self.fetch::<TxRecord>(&key).await,
            CollectionId::Token => self.fetch::<TokenRecord>(&key).await,
            CollectionId::Status => self.fetch::<SyncStatus>(&key).await,
            CollectionId::ProcessedTx => self.fetch::<ProcessedTx>(&key).await,
            CollectionId::Utxo => self.fetch::<UtxoEntry>(&key).await,
            CollectionId::PinClaim => self.fetch::<PinClaim>(&key).await,
        }
    }

    async fn delete_entry(
        &self,
        collection: CollectionId,
        key: Option<String>,
    ) -> Result<WriteAck> {
        let key = resolve_key(collection, key)?;

        match collection {
            CollectionId::Address => self.remove::<AddressRecord>(&key).await?,
            CollectionId::Transaction => self.remove::<TxRecord>(&key).await?,
            CollectionId::Token => self.remove::<TokenRecord>(&key).await?,
            CollectionId::Status => self.remove::<SyncStatus>(&key).await?,
            CollectionId::ProcessedTx => self.remove::<ProcessedTx>(&key).await?,
            CollectionId::Utxo => self.remove::<UtxoEntry>(&key).await?,
            CollectionId::PinClaim => self.remove::<PinClaim>(&key).await?,
        }

        tracing::debug!("Deleted {collection} entry {key}");

        Ok(WriteAck { key, success: true })
    }

    async fn backup(&self, dest: PathBuf) -> Result<BackupAck> {
        let store = self.store.clone();
        let path = dest.clone();
        tokio::task::spawn_blocking(move || store.backup(&path))
            .await
            .map_err(|err| Error::Other(format!("backup task failed: {err}")))??;

        Ok(BackupAck {
            path: dest,
            success: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NOT_FOUND;
    use jsonrpsee::types::ErrorObjectOwned;
    use serde_json::json;

    const TXID: &str = "f3e14cd871402a766e85045dc552f14c1d1a7a3f70ac5fd3b7c9b9e4fef5e315";

    fn level() -> Level {
        Level::new(Arc::new(StoreManager::open_in_memory()))
    }

    fn code(err: Error) -> i32 {
        ErrorObjectOwned::from(err).code()
    }

    fn token_json(minted: &str, burned: &str) -> Value {
        json!({
            "tokenId": "token-a",
            "ticker": "TKA",
            "name": "Token A",
            "decimals": 2,
            "totalMinted": minted,
            "totalBurned": burned,
            "txs": ["token-a"]
        })
    }

    #[tokio::test]
    async fn test_crud_cycle() {
        let level = level();

        let ack = level
            .create_entry(CollectionId::Token, Some("token-a".into()), token_json("100", "0"))
            .await
            .unwrap();
        assert_eq!(
            ack,
            WriteAck {
                key: "token-a".into(),
                success: true
            }
        );

        level
            .update_entry(CollectionId::Token, Some("token-a".into()), token_json("100", "40"))
            .await
            .unwrap();
        let stored = level
            .get_entry(CollectionId::Token, Some("token-a".into()))
            .await
            .unwrap();
        assert_eq!(stored["totalBurned"], "40");
        assert_eq!(stored["tokenType"], 1);

        level
            .delete_entry(CollectionId::Token, Some("token-a".into()))
            .await
            .unwrap();
        let err = level
            .get_entry(CollectionId::Token, Some("token-a".into()))
            .await
            .unwrap_err();
        assert_eq!(code(err), NOT_FOUND);
    }

    #[tokio::test]
    async fn test_values_must_match_collection_type() {
        let level = level();

        let err = level
            .create_entry(
                CollectionId::Transaction,
                Some(TXID.into()),
                json!({ "hello": "world" }),
            )
            .await
            .unwrap_err();
        assert_eq!(code(err), -32602);

        let err = level
            .create_entry(CollectionId::Address, None, json!({}))
            .await
            .unwrap_err();
        assert_eq!(code(err), -32602);
    }

    #[tokio::test]
    async fn test_status_single_entry() {
        let level = level();
        let status = json!({
            "startBlockHeight": 543376,
            "syncedBlockHeight": 600000,
            "chainBlockHeight": 600010
        });

        level
            .create_entry(CollectionId::Status, None, status.clone())
            .await
            .unwrap();
        assert_eq!(
            level
                .get_entry(CollectionId::Status, Some("status".into()))
                .await
                .unwrap(),
            status
        );
        assert_eq!(
            level.get_entry(CollectionId::Status, Some(String::new())).await.unwrap(),
            status
        );

        let err = level
            .update_entry(CollectionId::Status, Some("other".into()), status)
            .await
            .unwrap_err();
        assert_eq!(code(err), -32602);
    }

    #[tokio::test]
    async fn test_utxo_key_must_match_entry() {
        let level = level();
        let entry = json!({
            "txid": TXID,
            "vout": 1,
            "address": "bitcoincash:qr2u4f2hmva6jdhd6h0gdl6ly3fq5mtk8vmfq9jv0k",
            "value": 546
        });

        let err = level
            .create_entry(CollectionId::Utxo, Some(TXID.into()), entry.clone())
            .await
            .unwrap_err();
        assert_eq!(code(err), -32602);

        let err = level
            .create_entry(CollectionId::Utxo, Some(format!("{TXID}:0")), entry.clone())
            .await
            .unwrap_err();
        assert_eq!(code(err), -32602);

        level
            .create_entry(CollectionId::Utxo, Some(format!("{TXID}:1")), entry)
            .await
            .unwrap();
        assert!(
            level
                .get_entry(CollectionId::Utxo, Some(format!("{TXID}:1")))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_backup_of_on_disk_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(
            StoreManager::open(&slp_storage::StoreConfig {
                path: dir.path().join("current"),
                hot_cache_size: 8 << 20,
            })
            .unwrap(),
        );
        let level = Level::new(store.clone());
        level
            .create_entry(CollectionId::Token, Some("token-a".into()), token_json("5", "0"))
            .await
            .unwrap();

        let dest = dir.path().join("backup");
        let ack = level.backup(dest.clone()).await.unwrap();
        assert!(ack.success);
        for id in CollectionId::ALL {
            assert!(dest.join(id.dir_name()).is_dir());
        }

        // The destination now holds data.
        assert!(level.backup(dest).await.is_err());
        store.close_all().unwrap();
    }
}
