use crate::TokenAmount;
use serde::{Deserialize, Serialize};

/// Burn accounting of a token, derived from `totalMinted` and `totalBurned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurnState {
    /// Nothing has been burned.
    Unburned,
    /// Some, but not all, of the minted supply has been burned.
    PartialBurn,
    /// The whole minted supply has been burned.
    FullyBurned,
    /// More was burned than minted. This is never a legitimate state.
    OverBurned,
}

impl BurnState {
    /// Whether this state deserves attention from an operator.
    pub fn is_anomaly(&self) -> bool {
        matches!(self, Self::PartialBurn | Self::OverBurned)
    }
}

/// Aggregate token statistics, without the transaction history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenStats {
    pub token_id: String,
    #[serde(alias = "symbol")]
    pub ticker: String,
    pub name: String,
    pub decimals: u8,
    #[serde(default = "default_token_type")]
    pub token_type: u8,
    #[serde(default)]
    pub document_uri: Option<String>,
    #[serde(default)]
    pub document_hash: Option<String>,
    pub total_minted: TokenAmount,
    pub total_burned: TokenAmount,
}

fn default_token_type() -> u8 {
    1
}

impl TokenStats {
    pub fn burn_state(&self) -> BurnState {
        if self.total_burned.is_zero() {
            BurnState::Unburned
        } else if self.total_burned > self.total_minted {
            BurnState::OverBurned
        } else if self.total_burned == self.total_minted {
            BurnState::FullyBurned
        } else {
            BurnState::PartialBurn
        }
    }

    /// Tokens still in circulation, `None` when the record is over-burned.
    pub fn circulating_supply(&self) -> Option<TokenAmount> {
        self.total_minted.checked_sub(self.total_burned)
    }
}

/// Token record stored under the token id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    #[serde(flatten)]
    pub stats: TokenStats,
    /// Ids of the transactions involving the token, in the order they were indexed.
    #[serde(default)]
    pub txs: Vec<String>,
}

impl TokenRecord {
    pub fn burn_state(&self) -> BurnState {
        self.stats.burn_state()
    }

    /// Drops the transaction history.
    pub fn into_stats(self) -> TokenStats {
        self.stats
    }
}
