//! # Ports Layer
//!
//! Hexagonal boundaries of the subsystem.

pub mod inbound;
pub mod outbound;

pub use inbound::{DaSignersApi, TxContext};
pub use outbound::{
    AuthorityCheck, BatchOperation, EventSink, KVStoreError, KeyValueStore, ScanResult,
    StakeLedger,
};
