//! # Inbound Ports (Driving Ports)
//!
//! API the host runtime drives: message handlers, the block hook and
//! read-only queries.

use crate::domain::{Account, AggregatePubkey, GenesisState, Params, Quorum, Signer};
use crate::error::DaSignersResult;
use crate::messages::{MsgChangeParams, MsgRegisterNextEpoch, MsgRegisterSigner, MsgUpdateSocket};

/// Execution context of a transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxContext {
    /// Height of the block containing the transaction
    pub block_height: u64,
    /// Authenticated sender of the transaction
    pub sender: String,
}

impl TxContext {
    pub fn new(block_height: u64, sender: impl Into<String>) -> Self {
        Self {
            block_height,
            sender: sender.into(),
        }
    }
}

/// Primary API for the DA Signers subsystem.
///
/// Handlers are atomic per call: on error nothing is written.
pub trait DaSignersApi {
    /// Register a signer after checking stake and the ownership proof.
    fn register_signer(&mut self, ctx: &TxContext, msg: MsgRegisterSigner) -> DaSignersResult<()>;

    /// Replace the socket of the sender's signer record.
    fn update_socket(&mut self, ctx: &TxContext, msg: MsgUpdateSocket) -> DaSignersResult<()>;

    /// Store the sender's registration for `epoch_number() + 1`.
    fn register_next_epoch(
        &mut self,
        ctx: &TxContext,
        msg: MsgRegisterNextEpoch,
    ) -> DaSignersResult<()>;

    /// Replace the parameters. Governance only.
    fn change_params(&mut self, ctx: &TxContext, msg: MsgChangeParams) -> DaSignersResult<()>;

    /// Block hook. Returns the new epoch number if this block rotated.
    fn begin_block(&mut self, height: u64) -> DaSignersResult<Option<u64>>;

    /// Signer record of `account`.
    fn signer(&self, account: &Account) -> DaSignersResult<Signer>;

    /// Records for every account, or `SignerNotFound` if any is missing.
    fn get_signers(&self, accounts: &[Account]) -> DaSignersResult<Vec<Signer>>;

    fn is_signer(&self, account: &Account) -> DaSignersResult<bool>;

    /// Whether `account` registered for `epoch`.
    fn registered_epoch(&self, account: &Account, epoch: u64) -> DaSignersResult<bool>;

    fn params(&self) -> DaSignersResult<Params>;

    fn epoch_number(&self) -> DaSignersResult<u64>;

    fn quorum_count(&self, epoch: u64) -> DaSignersResult<u64>;

    fn quorum(&self, epoch: u64, quorum_id: u64) -> DaSignersResult<Quorum>;

    fn quorum_row(&self, epoch: u64, quorum_id: u64, row_index: u64) -> DaSignersResult<Account>;

    /// Aggregate key and row weight of the operators set in `bitmap`.
    fn aggregate_pubkey_g1(
        &self,
        epoch: u64,
        quorum_id: u64,
        bitmap: &[u8],
    ) -> DaSignersResult<AggregatePubkey>;

    /// Full state, suitable for [`GenesisState`] re-import.
    fn export_genesis(&self) -> DaSignersResult<GenesisState>;
}
