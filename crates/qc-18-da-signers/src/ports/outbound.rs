//! # Outbound Ports (Driven Ports)
//!
//! Collaborators the host runtime provides to the DA Signers service.

use crate::domain::Account;
use crate::events::DaSignersEvent;
use std::fmt;

/// Key-value store failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KVStoreError {
    /// I/O error during read/write.
    IOError { message: String },
    /// Data corruption in the store.
    CorruptionError { message: String },
}

impl fmt::Display for KVStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KVStoreError::IOError { message } => write!(f, "KV store I/O error: {}", message),
            KVStoreError::CorruptionError { message } => {
                write!(f, "KV store corruption: {}", message)
            }
        }
    }
}

impl std::error::Error for KVStoreError {}

/// Entries returned by a prefix scan, in ascending key order.
pub type ScanResult = Vec<(Vec<u8>, Vec<u8>)>;

/// Sorted key-value store owned by the host.
///
/// The host wraps each block in a transaction, so a failed block leaves no
/// trace. Within a block, the service commits each call with a single
/// [`KeyValueStore::atomic_batch_write`].
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Put a single key-value pair.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError>;

    /// Either all operations are applied or none are.
    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;

    /// Check if a key exists.
    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError>;

    /// All entries whose key starts with `prefix`, sorted by key.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError>;
}

/// Batch operation for atomic writes.
///
/// Records are never removed: quorum sets are superseded and stale
/// registrations stay queryable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    Put { key: Vec<u8>, value: Vec<u8> },
}

impl BatchOperation {
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Read access to the staking subsystem at the current block height.
pub trait StakeLedger: Send + Sync {
    /// Bonded stake of `account`, in staking base units.
    fn bonded_stake(&self, account: &Account) -> u128;

    /// Whether `account` has any bonded delegation.
    fn delegator_is_bonded(&self, account: &Account) -> bool {
        self.bonded_stake(account) > 0
    }
}

/// Destination for subsystem events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: DaSignersEvent);
}

/// Decides who may change parameters.
pub trait AuthorityCheck: Send + Sync {
    fn is_authorized(&self, sender: &str) -> bool;

    /// Authority reported in rejection errors.
    fn describe(&self) -> String;
}
