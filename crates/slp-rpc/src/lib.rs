//! JSON-RPC surface of the SLP indexer.

mod error;
mod level;
mod slp;

pub use error::{Error, NOT_FOUND, STORE_FAILURE};
pub use level::{BackupAck, Level, LevelApiServer, WriteAck};
pub use slp::{Slp, SlpApiServer};

use slp_indexer::SlpUseCases;
use slp_storage::StoreManager;
use std::sync::Arc;

/// SLP indexer RPC.
pub struct SlpRpc {
    /// Token query RPC.
    pub slp: Slp,
    /// Store maintenance RPC.
    pub level: Level,
}

impl SlpRpc {
    /// Creates a new instance of [`SlpRpc`].
    pub fn new(use_cases: SlpUseCases, store: Arc<StoreManager>) -> Self {
        Self {
            slp: Slp::new(use_cases),
            level: Level::new(store),
        }
    }

    /// Merges the SLP RPC components into a given RPC method registry.
    pub fn merge_into(
        self,
        module: &mut jsonrpsee::Methods,
    ) -> Result<(), jsonrpsee::server::RegisterMethodError> {
        let Self { slp, level } = self;

        module.merge(slp.into_rpc())?;
        module.merge(level.into_rpc())?;

        Ok(())
    }
}
