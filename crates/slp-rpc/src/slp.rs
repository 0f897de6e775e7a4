use crate::error::Error;
use jsonrpsee::proc_macros::rpc;
use slp_indexer::{SlpUseCases, TokenView};
use slp_primitives::{AddressRecord, SyncStatus, TxRecord};

/// SLP token query API.
#[rpc(server)]
pub trait SlpApi {
    /// Token balances, outputs and history of an address.
    #[method(name = "slp_getAddress")]
    async fn get_address(&self, address: String) -> Result<AddressRecord, Error>;

    /// Indexed transaction by txid.
    #[method(name = "slp_getTx")]
    async fn get_tx(&self, txid: String) -> Result<TxRecord, Error>;

    /// Token statistics.
    ///
    /// # Arguments
    ///
    /// - `token_id`: Token id, the txid of its genesis transaction.
    /// - `with_tx_history`: Include the token's transaction history. Defaults to `false`.
    #[method(name = "slp_getToken")]
    async fn get_token(
        &self,
        token_id: String,
        with_tx_history: Option<bool>,
    ) -> Result<TokenView, Error>;

    /// Indexer sync status.
    #[method(name = "slp_getStatus")]
    async fn get_status(&self) -> Result<SyncStatus, Error>;
}

/// This struct provides the SLP API.
pub struct Slp {
    use_cases: SlpUseCases,
}

impl Slp {
    /// Constructs a new instance of [`Slp`].
    pub fn new(use_cases: SlpUseCases) -> Self {
        Self { use_cases }
    }
}

#[async_trait::async_trait]
impl SlpApiServer for Slp {
    async fn get_address(&self, address: String) -> Result<AddressRecord, Error> {
        Ok(self.use_cases.get_address(&address).await?)
    }

    async fn get_tx(&self, txid: String) -> Result<TxRecord, Error> {
        Ok(self.use_cases.get_tx(&txid).await?)
    }

    async fn get_token(
        &self,
        token_id: String,
        with_tx_history: Option<bool>,
    ) -> Result<TokenView, Error> {
        Ok(self
            .use_cases
            .get_token(&token_id, with_tx_history.unwrap_or(false))
            .await?)
    }

    async fn get_status(&self) -> Result<SyncStatus, Error> {
        Ok(self.use_cases.get_status().await?)
    }
}
