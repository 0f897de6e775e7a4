//! Query functions for the indexer store.

use crate::error::{Error, Result};
use slp_primitives::{AddressRecord, SyncStatus, TokenRecord, TxRecord};
use slp_storage::{Collection, StoreManager};

/// Read access to indexed SLP data.
#[async_trait::async_trait]
pub trait SlpQueryApi: Send + Sync {
    /// Holdings and history of `address`.
    async fn get_address(&self, address: &str) -> Result<AddressRecord>;

    async fn get_tx(&self, txid: &str) -> Result<TxRecord>;

    /// Full token record, transaction history included.
    async fn get_token(&self, token_id: &str) -> Result<TokenRecord>;

    async fn get_status(&self) -> Result<SyncStatus>;
}

/// Query interface over the store collections.
#[derive(Clone)]
pub struct SlpQuery {
    addresses: Collection<AddressRecord>,
    transactions: Collection<TxRecord>,
    tokens: Collection<TokenRecord>,
    status: Collection<SyncStatus>,
}

impl SlpQuery {
    pub fn new(store: &StoreManager) -> Self {
        Self {
            addresses: store.addresses(),
            transactions: store.transactions(),
            tokens: store.tokens(),
            status: store.status(),
        }
    }
}

fn require(value: &str, what: &str, operation: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "{what} required when calling {operation}()"
        )));
    }
    Ok(())
}

#[async_trait::async_trait]
impl SlpQueryApi for SlpQuery {
    async fn get_address(&self, address: &str) -> Result<AddressRecord> {
        require(address, "address", "get_address")?;
        tracing::debug!(address, "Querying address");
        self.addresses
            .get(address)
            .await
            .map_err(Error::store("get_address", address))
    }

    async fn get_tx(&self, txid: &str) -> Result<TxRecord> {
        require(txid, "txid", "get_tx")?;
        tracing::debug!(txid, "Querying transaction");
        self.transactions
            .get(txid)
            .await
            .map_err(Error::store("get_tx", txid))
    }

    async fn get_token(&self, token_id: &str) -> Result<TokenRecord> {
        require(token_id, "tokenId", "get_token")?;
        tracing::debug!(token_id, "Querying token");
        self.tokens
            .get(token_id)
            .await
            .map_err(Error::store("get_token", token_id))
    }

    async fn get_status(&self) -> Result<SyncStatus> {
        self.status
            .get_status()
            .await
            .map_err(Error::store("get_status", slp_primitives::STATUS_KEY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use slp_primitives::{TokenAmount, TokenStats};

    fn token() -> TokenRecord {
        TokenRecord {
            stats: TokenStats {
                token_id: "token-a".into(),
                ticker: "TKA".into(),
                name: "Token A".into(),
                decimals: 0,
                token_type: 1,
                document_uri: None,
                document_hash: None,
                total_minted: TokenAmount(21),
                total_burned: TokenAmount(0),
            },
            txs: vec!["tx-1".into(), "tx-2".into()],
        }
    }

    #[tokio::test]
    async fn test_returns_stored_records_unmodified() {
        let store = StoreManager::open_in_memory();
        store.tokens().put("token-a", &token()).await.unwrap();
        let status = SyncStatus {
            start_block_height: 543_376,
            synced_block_height: 700_000,
            chain_block_height: 700_000,
        };
        store.status().put_status(&status).await.unwrap();

        let query = SlpQuery::new(&store);
        assert_eq!(query.get_token("token-a").await.unwrap(), token());
        assert_eq!(query.get_status().await.unwrap(), status);
    }

    #[tokio::test]
    async fn test_absent_keys_are_not_found() {
        let store = StoreManager::open_in_memory();
        let query = SlpQuery::new(&store);

        let err = query.get_address("bitcoincash:unknown").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().starts_with("get_address(\"bitcoincash:unknown\")"));

        assert_eq!(
            query.get_tx("00").await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            query.get_status().await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn test_empty_arguments_rejected_before_store_access() {
        let store = StoreManager::open_in_memory();
        let query = SlpQuery::new(&store);
        // A closed store would fail any access with a store error.
        store.close_all().unwrap();

        for err in [
            query.get_address("").await.unwrap_err(),
            query.get_tx("").await.unwrap_err(),
            query.get_token("").await.unwrap_err(),
        ] {
            assert!(matches!(err, Error::InvalidArgument(_)), "{err:?}");
        }
        assert_eq!(
            query.get_token("token-a").await.unwrap_err().kind(),
            ErrorKind::Store
        );
    }
}
