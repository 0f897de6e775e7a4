use serde::{Deserialize, Serialize};

/// The only key under which sync status is stored.
pub const STATUS_KEY: &str = "status";

/// Indexer progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    /// Block height the indexer started from.
    pub start_block_height: u32,
    /// Highest block whose effects are fully applied.
    pub synced_block_height: u32,
    /// Chain tip as last observed by the indexer.
    pub chain_block_height: u32,
}

impl SyncStatus {
    /// Number of blocks between the synced height and the chain tip.
    pub fn blocks_behind(&self) -> u32 {
        self.chain_block_height
            .saturating_sub(self.synced_block_height)
    }

    /// Whether replacing `previous` with `self` would move sync progress backwards.
    pub fn regresses(&self, previous: &SyncStatus) -> bool {
        self.synced_block_height < previous.synced_block_height
    }
}
