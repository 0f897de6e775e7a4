use crate::TokenAmount;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinClaimStatus {
    /// Claim seen on chain but not yet checked.
    #[default]
    Unprocessed,
    /// Payment verified, content not yet pinned.
    Validated,
    Pinned,
    /// Payment insufficient or content unreachable.
    Rejected,
}

/// On-chain payment claim for pinning content, stored under the claim id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinClaim {
    /// Transaction carrying the claim.
    pub txid: String,
    /// Content identifier of the data to pin.
    pub cid: String,
    /// Tokens paid for the pin.
    pub amount: TokenAmount,
    pub timestamp: u64,
    #[serde(default)]
    pub status: PinClaimStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}
