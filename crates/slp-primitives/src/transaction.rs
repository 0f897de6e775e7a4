use crate::TokenAmount;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxInput {
    /// Id of the transaction that created the spent output.
    pub txid: String,
    pub vout: u32,
    #[serde(default)]
    pub address: Option<String>,
    /// Value in satoshis.
    #[serde(default)]
    pub value: u64,
    #[serde(default)]
    pub token_qty: Option<TokenAmount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxOutput {
    pub vout: u32,
    #[serde(default)]
    pub address: Option<String>,
    /// Value in satoshis.
    #[serde(default)]
    pub value: u64,
    #[serde(default)]
    pub token_qty: Option<TokenAmount>,
}

/// SLP message type carried by a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SlpTxType {
    Genesis,
    Mint,
    Send,
    Burn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlpTxInfo {
    pub token_id: String,
    pub tx_type: SlpTxType,
    pub is_valid: bool,
}

/// Indexed transaction detail, stored under the txid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxRecord {
    pub txid: String,
    /// Block time as a unix timestamp.
    pub timestamp: u64,
    #[serde(default)]
    pub block_height: Option<u32>,
    #[serde(default)]
    pub inputs: Vec<TxInput>,
    #[serde(default)]
    pub outputs: Vec<TxOutput>,
    /// Present only for transactions carrying an SLP message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slp: Option<SlpTxInfo>,
}

/// How the crawler disposed of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessOutcome {
    /// Effects were applied to addresses, tokens and UTXOs.
    Applied,
    /// The SLP message was invalid; nothing was applied.
    Invalid,
    /// Not an SLP transaction.
    Ignored,
}

/// Dedup marker stored under the txid once a transaction has been handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedTx {
    pub txid: String,
    /// Unix timestamp at which the transaction was processed.
    pub processed_at: u64,
    pub outcome: ProcessOutcome,
}
