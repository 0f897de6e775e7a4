use crate::TokenAmount;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Key of the UTXO collection.
///
/// Format: `<txid>:<vout>`. No other collection uses this format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtxoKey {
    pub txid: String,
    pub vout: u32,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UtxoKeyError {
    #[error("UTXO key {0:?} is not of the form <txid>:<vout>")]
    MissingSeparator(String),
    #[error("UTXO key {0:?} has an empty txid")]
    EmptyTxid(String),
    #[error("UTXO key {0:?} has an invalid output index")]
    InvalidVout(String),
}

impl UtxoKey {
    pub fn new(txid: impl Into<String>, vout: u32) -> Self {
        Self {
            txid: txid.into(),
            vout,
        }
    }
}

impl fmt::Display for UtxoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.vout)
    }
}

impl FromStr for UtxoKey {
    type Err = UtxoKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (txid, vout) = s
            .rsplit_once(':')
            .ok_or_else(|| UtxoKeyError::MissingSeparator(s.to_string()))?;
        if txid.is_empty() {
            return Err(UtxoKeyError::EmptyTxid(s.to_string()));
        }
        let vout = vout
            .parse()
            .map_err(|_| UtxoKeyError::InvalidVout(s.to_string()))?;
        Ok(Self::new(txid, vout))
    }
}

/// Reverse lookup from an outpoint to the address owning it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtxoEntry {
    pub txid: String,
    pub vout: u32,
    pub address: String,
    /// Value in satoshis.
    #[serde(default)]
    pub value: u64,
    #[serde(default)]
    pub spent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qty: Option<TokenAmount>,
}

impl UtxoEntry {
    /// The key this entry is stored under.
    pub fn key(&self) -> UtxoKey {
        UtxoKey::new(self.txid.clone(), self.vout)
    }
}
