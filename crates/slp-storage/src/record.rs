use crate::CollectionId;
use serde::Serialize;
use serde::de::DeserializeOwned;
use slp_primitives::{
    AddressRecord, PinClaim, ProcessedTx, SyncStatus, TokenRecord, TxRecord, UtxoEntry,
};

/// A value type stored in exactly one collection.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: CollectionId;
}

impl Record for AddressRecord {
    const COLLECTION: CollectionId = CollectionId::Address;
}

impl Record for TxRecord {
    const COLLECTION: CollectionId = CollectionId::Transaction;
}

impl Record for TokenRecord {
    const COLLECTION: CollectionId = CollectionId::Token;
}

impl Record for SyncStatus {
    const COLLECTION: CollectionId = CollectionId::Status;
}

impl Record for ProcessedTx {
    const COLLECTION: CollectionId = CollectionId::ProcessedTx;
}

impl Record for UtxoEntry {
    const COLLECTION: CollectionId = CollectionId::Utxo;
}

impl Record for PinClaim {
    const COLLECTION: CollectionId = CollectionId::PinClaim;
}
