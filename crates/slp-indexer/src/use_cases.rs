//! Token-level business rules on top of the query layer.

use crate::blacklist::Blacklist;
use crate::error::{Error, Result};
use crate::queries::SlpQueryApi;
use serde::Serialize;
use slp_primitives::{AddressRecord, SyncStatus, TokenRecord, TokenStats, TxRecord};
use std::sync::Arc;

/// Name reported in place of a blacklisted token's real name.
pub const NOT_AVAILABLE: &str = "not-available";

/// Token as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TokenView {
    /// The token is blacklisted; nothing beyond its id is disclosed.
    #[serde(rename_all = "camelCase")]
    Unavailable { token_id: String, name: String },
    /// Statistics without the transaction history.
    Summary(TokenStats),
    /// Statistics with the full transaction history.
    Full(TokenRecord),
}

impl TokenView {
    fn unavailable(token_id: &str) -> Self {
        Self::Unavailable {
            token_id: token_id.to_string(),
            name: NOT_AVAILABLE.to_string(),
        }
    }
}

/// Entry point of the SLP read path.
#[derive(Clone)]
pub struct SlpUseCases {
    query: Arc<dyn SlpQueryApi>,
    blacklist: Arc<Blacklist>,
}

impl SlpUseCases {
    pub fn new(query: Arc<dyn SlpQueryApi>, blacklist: Arc<Blacklist>) -> Self {
        Self { query, blacklist }
    }

    pub async fn get_address(&self, address: &str) -> Result<AddressRecord> {
        if address.is_empty() {
            return Err(Error::InvalidArgument(
                "Address required when calling get_address()".into(),
            ));
        }
        self.query.get_address(address).await
    }

    pub async fn get_tx(&self, txid: &str) -> Result<TxRecord> {
        if txid.is_empty() {
            return Err(Error::InvalidArgument(
                "txid required when calling get_tx()".into(),
            ));
        }
        self.query.get_tx(txid).await
    }

    /// Token statistics, with the transaction history only when asked for.
    ///
    /// Blacklisted tokens are answered without touching the store.
    pub async fn get_token(&self, token_id: &str, with_tx_history: bool) -> Result<TokenView> {
        if token_id.is_empty() {
            return Err(Error::InvalidArgument(
                "tokenId required when calling get_token()".into(),
            ));
        }

        if self.blacklist.is_blacklisted(token_id) {
            tracing::debug!(token_id, "Token is blacklisted");
            return Ok(TokenView::unavailable(token_id));
        }

        let record = self.query.get_token(token_id).await?;

        Ok(if with_tx_history {
            TokenView::Full(record)
        } else {
            TokenView::Summary(record.into_stats())
        })
    }

    pub async fn get_status(&self) -> Result<SyncStatus> {
        self.query.get_status().await
    }
}
