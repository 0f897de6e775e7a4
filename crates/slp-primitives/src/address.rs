use crate::TokenAmount;
use serde::{Deserialize, Serialize};

/// Balance of a single token held by an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    pub token_id: String,
    pub qty: TokenAmount,
}

/// A token-carrying output owned by an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressUtxo {
    pub txid: String,
    pub vout: u32,
    /// Value of the output in satoshis.
    #[serde(default)]
    pub value: u64,
    #[serde(default)]
    pub token_id: Option<String>,
    #[serde(default)]
    pub qty: Option<TokenAmount>,
}

/// Current holdings of an address, stored under the address string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRecord {
    #[serde(default)]
    pub balances: Vec<TokenBalance>,
    #[serde(default)]
    pub utxos: Vec<AddressUtxo>,
    /// Ids of the transactions that touched this address, oldest first.
    #[serde(default)]
    pub txs: Vec<String>,
}

impl AddressRecord {
    /// Returns the balance of `token_id`, zero if the address never held it.
    pub fn balance_of(&self, token_id: &str) -> TokenAmount {
        self.balances
            .iter()
            .find(|balance| balance.token_id == token_id)
            .map(|balance| balance.qty)
            .unwrap_or_default()
    }
}
