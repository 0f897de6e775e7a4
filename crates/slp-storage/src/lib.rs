//! Persistent store of the SLP indexer.
//!
//! ## Architecture
//!
//! - **Collections**: seven independently keyed collections, each an ordered
//!   key-value engine instance of its own living in a dedicated directory under the
//!   store root. Values are JSON-encoded typed records.
//! - **Store manager**: opens every collection at startup and closes (flushes) all of
//!   them at shutdown, reporting each collection that failed to close.
//! - **Snapshots**: consistent on-disk checkpoints of every collection for backup,
//!   and an offline restore that copies a snapshot back into place.
//!
//! Writes are atomic only within a single collection; nothing orders or batches
//! writes across collections.

mod backend;
mod collection;
mod error;
mod manager;
mod record;

pub use backend::{InMemBackend, KvBackend, RocksDbBackend};
pub use collection::Collection;
pub use error::{CloseError, Error};
pub use manager::{DEFAULT_HOT_CACHE_SIZE, StoreConfig, StoreManager};
pub use record::Record;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Identifies one of the seven collections.
///
/// The serde names are the short names used by the CRUD surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionId {
    #[serde(rename = "addr")]
    Address,
    #[serde(rename = "tx")]
    Transaction,
    #[serde(rename = "token")]
    Token,
    #[serde(rename = "status")]
    Status,
    #[serde(rename = "ptx")]
    ProcessedTx,
    #[serde(rename = "utxo")]
    Utxo,
    #[serde(rename = "pinclaim")]
    PinClaim,
}

impl CollectionId {
    /// All collections, in the order they are opened and closed.
    pub const ALL: [CollectionId; 7] = [
        Self::Address,
        Self::Transaction,
        Self::Token,
        Self::Status,
        Self::ProcessedTx,
        Self::Utxo,
        Self::PinClaim,
    ];

    /// Directory of the collection under the store root.
    pub const fn dir_name(&self) -> &'static str {
        match self {
            Self::Address => "addrs",
            Self::Transaction => "txs",
            Self::Token => "tokens",
            Self::Status => "status",
            Self::ProcessedTx => "ptxs",
            Self::Utxo => "utxos",
            Self::PinClaim => "pinClaim",
        }
    }

    /// Short name used by the CRUD surface.
    pub const fn short_name(&self) -> &'static str {
        match self {
            Self::Address => "addr",
            Self::Transaction => "tx",
            Self::Token => "token",
            Self::Status => "status",
            Self::ProcessedTx => "ptx",
            Self::Utxo => "utxo",
            Self::PinClaim => "pinclaim",
        }
    }

    /// Address and Transaction carry most of the read and write traffic.
    pub const fn is_hot(&self) -> bool {
        matches!(self, Self::Address | Self::Transaction)
    }

    const fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for CollectionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.short_name() == s || id.dir_name() == s)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown collection: {s}")))
    }
}
