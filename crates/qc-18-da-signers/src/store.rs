//! # State Accessors
//!
//! Key layout and record codec over a [`KeyValueStore`].
//!
//! | Key | Value |
//! |-----|-------|
//! | `params` | [`Params`] |
//! | `epoch_number` | `u64` |
//! | `quorums:<epoch be8>` | [`QuorumSet`] |
//! | `signer:<account>` | [`Signer`] |
//! | `registration:<epoch be8><account>` | 64-byte signature |
//!
//! Every value is one version byte followed by the bincode payload.

use crate::domain::{Account, G1Bytes, Params, QuorumSet, Registration, Signer};
use crate::error::{DaSignersError, DaSignersResult};
use crate::ports::outbound::{BatchOperation, KVStoreError, KeyValueStore};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Current record version.
pub const RECORD_VERSION: u8 = 1;

impl From<KVStoreError> for DaSignersError {
    fn from(err: KVStoreError) -> Self {
        DaSignersError::Storage {
            reason: err.to_string(),
        }
    }
}

pub mod keys {
    use crate::domain::Account;

    pub const PARAMS: &[u8] = b"params";
    pub const EPOCH_NUMBER: &[u8] = b"epoch_number";
    pub const QUORUMS_PREFIX: &[u8] = b"quorums:";
    pub const SIGNER_PREFIX: &[u8] = b"signer:";
    pub const REGISTRATION_PREFIX: &[u8] = b"registration:";

    pub fn quorums(epoch: u64) -> Vec<u8> {
        [QUORUMS_PREFIX, &epoch.to_be_bytes()[..]].concat()
    }

    pub fn signer(account: &Account) -> Vec<u8> {
        [SIGNER_PREFIX, &account.0[..]].concat()
    }

    pub fn registrations(epoch: u64) -> Vec<u8> {
        [REGISTRATION_PREFIX, &epoch.to_be_bytes()[..]].concat()
    }

    pub fn registration(epoch: u64, account: &Account) -> Vec<u8> {
        [REGISTRATION_PREFIX, &epoch.to_be_bytes()[..], &account.0[..]].concat()
    }
}

/// Encode a record with the version prefix.
pub fn encode<T: Serialize>(value: &T) -> DaSignersResult<Vec<u8>> {
    let payload = bincode::serialize(value).map_err(|e| DaSignersError::Codec {
        reason: e.to_string(),
    })?;
    let mut out = Vec::with_capacity(payload.len() + 1);
    out.push(RECORD_VERSION);
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Decode a versioned record.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> DaSignersResult<T> {
    match bytes.split_first() {
        Some((&RECORD_VERSION, payload)) => {
            bincode::deserialize(payload).map_err(|e| DaSignersError::Storage {
                reason: format!("corrupt record: {}", e),
            })
        }
        Some((version, _)) => Err(DaSignersError::Storage {
            reason: format!("unknown record version {}", version),
        }),
        None => Err(DaSignersError::Storage {
            reason: "empty record".to_string(),
        }),
    }
}

fn signature_from_record(raw: &[u8]) -> DaSignersResult<G1Bytes> {
    raw.try_into().map_err(|_| DaSignersError::Storage {
        reason: format!("registration signature has {} bytes", raw.len()),
    })
}

/// Typed reads over the store.
pub struct StateReader<'a, S: KeyValueStore> {
    kv: &'a S,
}

impl<'a, S: KeyValueStore> StateReader<'a, S> {
    pub fn new(kv: &'a S) -> Self {
        Self { kv }
    }

    fn read<T: DeserializeOwned>(&self, key: &[u8]) -> DaSignersResult<Option<T>> {
        self.kv.get(key)?.map(|bytes| decode(&bytes)).transpose()
    }

    pub fn is_initialized(&self) -> DaSignersResult<bool> {
        Ok(self.kv.exists(keys::PARAMS)?)
    }

    pub fn params(&self) -> DaSignersResult<Params> {
        self.read(keys::PARAMS)?.ok_or_else(|| DaSignersError::Storage {
            reason: "params not initialized".to_string(),
        })
    }

    pub fn epoch_number(&self) -> DaSignersResult<u64> {
        self.read(keys::EPOCH_NUMBER)?
            .ok_or_else(|| DaSignersError::Storage {
                reason: "epoch number not initialized".to_string(),
            })
    }

    pub fn quorums(&self, epoch: u64) -> DaSignersResult<Option<QuorumSet>> {
        self.read(&keys::quorums(epoch))
    }

    pub fn signer(&self, account: &Account) -> DaSignersResult<Option<Signer>> {
        self.read(&keys::signer(account))
    }

    pub fn has_signer(&self, account: &Account) -> DaSignersResult<bool> {
        Ok(self.kv.exists(&keys::signer(account))?)
    }

    pub fn all_signers(&self) -> DaSignersResult<Vec<Signer>> {
        self.kv
            .prefix_scan(keys::SIGNER_PREFIX)?
            .iter()
            .map(|(_, value)| decode(value))
            .collect()
    }

    pub fn registration(&self, epoch: u64, account: &Account) -> DaSignersResult<Option<G1Bytes>> {
        self.read::<Vec<u8>>(&keys::registration(epoch, account))?
            .map(|raw| signature_from_record(&raw))
            .transpose()
    }

    /// Registrations for `epoch`, in account order.
    pub fn registrations(&self, epoch: u64) -> DaSignersResult<Vec<Registration>> {
        let prefix = keys::registrations(epoch);
        self.kv
            .prefix_scan(&prefix)?
            .iter()
            .map(|(key, value)| {
                let raw: [u8; 20] = key[prefix.len()..].try_into().map_err(|_| {
                    DaSignersError::Storage {
                        reason: format!("malformed registration key {}", hex::encode(key)),
                    }
                })?;
                let signature = signature_from_record(&decode::<Vec<u8>>(value)?)?;
                Ok(Registration {
                    epoch,
                    account: Account(raw),
                    signature,
                })
            })
            .collect()
    }
}

/// Buffered writes committed with one atomic batch.
#[derive(Debug, Default)]
pub struct WriteBatch {
    ops: Vec<BatchOperation>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    fn put<T: Serialize>(&mut self, key: Vec<u8>, value: &T) -> DaSignersResult<()> {
        self.ops.push(BatchOperation::put(key, encode(value)?));
        Ok(())
    }

    pub fn put_params(&mut self, params: &Params) -> DaSignersResult<()> {
        self.put(keys::PARAMS.to_vec(), params)
    }

    pub fn put_epoch_number(&mut self, epoch: u64) -> DaSignersResult<()> {
        self.put(keys::EPOCH_NUMBER.to_vec(), &epoch)
    }

    pub fn put_quorums(&mut self, epoch: u64, set: &QuorumSet) -> DaSignersResult<()> {
        self.put(keys::quorums(epoch), set)
    }

    pub fn put_signer(&mut self, signer: &Signer) -> DaSignersResult<()> {
        self.put(keys::signer(&signer.account), signer)
    }

    pub fn put_registration(
        &mut self,
        epoch: u64,
        account: &Account,
        signature: &G1Bytes,
    ) -> DaSignersResult<()> {
        self.put(keys::registration(epoch, account), &signature.to_vec())
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Apply every buffered write atomically.
    pub fn commit<S: KeyValueStore>(self, kv: &mut S) -> DaSignersResult<()> {
        if self.ops.is_empty() {
            return Ok(());
        }
        kv.atomic_batch_write(self.ops)?;
        Ok(())
    }
}
