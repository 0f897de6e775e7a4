//! Record types persisted by the SLP indexer.
//!
//! Every collection of the store holds exactly one of the records defined here,
//! JSON-encoded with camelCase field names:
//!
//! - [`AddressRecord`]: token holdings per address.
//! - [`TxRecord`]: cached transaction detail.
//! - [`TokenRecord`]: per-token aggregate statistics.
//! - [`SyncStatus`]: indexer progress.
//! - [`ProcessedTx`]: dedup marker for applied transactions.
//! - [`UtxoEntry`]: reverse lookup from an outpoint to its owner.
//! - [`PinClaim`]: on-chain payment claims for content pinning.

mod address;
mod amount;
mod pin_claim;
mod status;
mod token;
mod transaction;
mod utxo;

pub use address::{AddressRecord, AddressUtxo, TokenBalance};
pub use amount::{ParseAmountError, TokenAmount};
pub use pin_claim::{PinClaim, PinClaimStatus};
pub use status::{STATUS_KEY, SyncStatus};
pub use token::{BurnState, TokenRecord, TokenStats};
pub use transaction::{
    ProcessOutcome, ProcessedTx, SlpTxInfo, SlpTxType, TxInput, TxOutput, TxRecord,
};
pub use utxo::{UtxoEntry, UtxoKey, UtxoKeyError};
