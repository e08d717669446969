//! DA Signers Service - registry, epoch rotation and quorum queries
//!
//! All state lives in the host's [`KeyValueStore`]; the service keeps no
//! cache between calls. Each handler reads what it needs, buffers its
//! writes in a [`WriteBatch`] and commits once, so a rejected call changes
//! nothing.

use crate::config::DaSignersConfig;
use crate::domain::bn254::{
    deserialize_g1, deserialize_g2, epoch_registration_hash, pubkey_registration_hash,
    verify_signature,
};
use crate::domain::{
    aggregate_quorum, ballots_for_stake, partition, Account, AggregatePubkey, Candidate, G1Bytes,
    GenesisState, Params, Quorum, QuorumSet, Registration, Signer,
};
use crate::error::{DaSignersError, DaSignersResult};
use crate::events::DaSignersEvent;
use crate::messages::{MsgChangeParams, MsgRegisterNextEpoch, MsgRegisterSigner, MsgUpdateSocket};
use crate::metrics;
use crate::ports::inbound::{DaSignersApi, TxContext};
use crate::ports::outbound::{AuthorityCheck, EventSink, KeyValueStore, StakeLedger};
use crate::store::{StateReader, WriteBatch};
use ark_bn254::G1Affine;
use tracing::{debug, error, info, warn};


/// DA Signers service.
///
/// Generic over its collaborators so the host can plug in production
/// storage and staking while tests use the in-memory adapters.
pub struct DaSignersService<S, L, E, A>
where
    S: KeyValueStore,
    L: StakeLedger,
    E: EventSink,
    A: AuthorityCheck,
{
    chain_id: u64,
    store: S,
    stake: L,
    events: E,
    authority: A,
}

impl<S, L, E, A> DaSignersService<S, L, E, A>
where
    S: KeyValueStore,
    L: StakeLedger,
    E: EventSink,
    A: AuthorityCheck,
{
    /// Create the service, writing `config.genesis` if the store is empty.
    pub fn new(
        config: &DaSignersConfig,
        store: S,
        stake: L,
        events: E,
        authority: A,
    ) -> DaSignersResult<Self> {
        let mut service = Self {
            chain_id: config.chain_id,
            store,
            stake,
            events,
            authority,
        };

        if service.reader().is_initialized()? {
            info!(
                "[qc-18] Resuming at epoch {}",
                service.reader().epoch_number()?
            );
        } else {
            service.init_genesis(&config.genesis)?;
        }
        Ok(service)
    }

    fn reader(&self) -> StateReader<'_, S> {
        StateReader::new(&self.store)
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Write a validated genesis state in one batch.
    pub fn init_genesis(&mut self, genesis: &GenesisState) -> DaSignersResult<()> {
        genesis.validate()?;

        let mut batch = WriteBatch::new();
        batch.put_params(&genesis.params)?;
        batch.put_epoch_number(genesis.epoch_number)?;
        for signer in &genesis.signers {
            batch.put_signer(signer)?;
        }
        for (epoch, set) in genesis.quorums_by_epoch.iter().enumerate() {
            batch.put_quorums(epoch as u64, set)?;
        }
        batch.commit(&mut self.store)?;

        info!(
            "[qc-18] Genesis initialized: epoch {}, {} signers",
            genesis.epoch_number,
            genesis.signers.len()
        );
        Ok(())
    }

    fn ensure_sender(ctx: &TxContext, account: &Account) -> DaSignersResult<()> {
        match Account::parse(&ctx.sender) {
            Ok(sender) if sender == *account => Ok(()),
            _ => Err(DaSignersError::Unauthorized {
                expected: account.to_string(),
                actual: ctx.sender.clone(),
            }),
        }
    }

    fn ensure_bonded(&self, account: &Account) -> DaSignersResult<()> {
        if self.stake.delegator_is_bonded(account) {
            Ok(())
        } else {
            Err(DaSignersError::InsufficientStake {
                account: account.to_string(),
            })
        }
    }

    /// Check `signature` over `hash` against both keys of `signer`.
    fn verify(signer: &Signer, hash: &G1Affine, signature: &G1Bytes) -> DaSignersResult<()> {
        let pubkey_g1 = deserialize_g1(&signer.pubkey_g1).map_err(|e| {
            DaSignersError::InvalidPubkey {
                reason: format!("G1: {}", e),
            }
        })?;
        let pubkey_g2 = deserialize_g2(&signer.pubkey_g2).map_err(|e| {
            DaSignersError::InvalidPubkey {
                reason: format!("G2: {}", e),
            }
        })?;
        let signature =
            deserialize_g1(signature).map_err(|e| DaSignersError::InvalidSignature {
                reason: e.to_string(),
            })?;

        if verify_signature(&pubkey_g1, &pubkey_g2, hash, &signature) {
            Ok(())
        } else {
            Err(DaSignersError::InvalidSignature {
                reason: format!("pairing check failed for {}", signer.account),
            })
        }
    }

    fn rejected<T>(operation: &str, result: DaSignersResult<T>) -> DaSignersResult<T> {
        if let Err(ref e) = result {
            warn!("[qc-18] {} rejected: {}", operation, e);
            metrics::record_rejected(e.label());
        }
        result
    }

    fn existing_signer(&self, account: &Account) -> DaSignersResult<Signer> {
        self.reader()
            .signer(account)?
            .ok_or_else(|| DaSignersError::SignerNotFound {
                account: account.to_string(),
            })
    }

    fn quorum_set(&self, epoch: u64) -> DaSignersResult<QuorumSet> {
        self.reader()
            .quorums(epoch)?
            .ok_or(DaSignersError::EpochNotFound { epoch })
    }

    /// Signers registered for `epoch` with a signer record and ballots.
    fn eligible_candidates(&self, epoch: u64, params: &Params) -> DaSignersResult<Vec<Candidate>> {
        let reader = self.reader();
        let mut candidates = Vec::new();

        for Registration {
            account, signature, ..
        } in reader.registrations(epoch)?
        {
            if !reader.has_signer(&account)? {
                warn!("[qc-18] Registration without signer record: {}", account);
                continue;
            }
            let ballots = ballots_for_stake(self.stake.bonded_stake(&account), params);
            if ballots == 0 {
                debug!("[qc-18] {} has no ballots for epoch {}", account, epoch);
                continue;
            }
            candidates.push(Candidate {
                account,
                ballots,
                registration: signature,
            });
        }
        Ok(candidates)
    }

    /// Build and commit the quorum set of `current + 1`.
    fn rotate(&mut self, height: u64, current: u64, params: &Params) -> DaSignersResult<u64> {
        let target = current + 1;
        let candidates = self.eligible_candidates(target, params)?;
        let signer_count = candidates.len();
        let set = partition(target, candidates, params)?;
        let quorum_count = set.quorum_count();

        let mut batch = WriteBatch::new();
        batch.put_quorums(target, &set)?;
        batch.put_epoch_number(target)?;
        batch.commit(&mut self.store)?;

        info!(
            "[qc-18] New DA signer epoch {} at height {}: {} signers, {} quorums",
            target, height, signer_count, quorum_count
        );
        metrics::record_rotation(target, quorum_count);
        self.events.emit(DaSignersEvent::EpochRotated {
            epoch: target,
            quorum_count,
            block_height: height,
        });
        Ok(target)
    }

    fn do_register_signer(&mut self, ctx: &TxContext, msg: MsgRegisterSigner) -> DaSignersResult<()> {
        msg.validate_basic()?;
        let signature = msg.signature_bytes()?;
        let signer = msg.signer;
        Self::ensure_sender(ctx, &signer.account)?;

        if self.reader().has_signer(&signer.account)? {
            return Err(DaSignersError::SignerExists {
                account: signer.account.to_string(),
            });
        }
        self.ensure_bonded(&signer.account)?;

        let hash = pubkey_registration_hash(signer.account.as_bytes(), self.chain_id);
        Self::verify(&signer, &hash, &signature)?;

        let mut batch = WriteBatch::new();
        batch.put_signer(&signer)?;
        batch.commit(&mut self.store)?;

        info!(
            "[qc-18] Registered DA signer {} at {}",
            signer.account, signer.socket
        );
        metrics::record_signer_registered();
        self.events.emit(DaSignersEvent::signer_updated(&signer));
        Ok(())
    }

    fn do_update_socket(&mut self, ctx: &TxContext, msg: MsgUpdateSocket) -> DaSignersResult<()> {
        msg.validate_basic()?;
        let account = msg.account()?;
        Self::ensure_sender(ctx, &account)?;

        let mut signer = self.existing_signer(&account)?;
        signer.socket = msg.socket;

        let mut batch = WriteBatch::new();
        batch.put_signer(&signer)?;
        batch.commit(&mut self.store)?;

        debug!("[qc-18] {} moved to {}", account, signer.socket);
        self.events.emit(DaSignersEvent::signer_updated(&signer));
        Ok(())
    }

    fn do_register_next_epoch(
        &mut self,
        ctx: &TxContext,
        msg: MsgRegisterNextEpoch,
    ) -> DaSignersResult<()> {
        msg.validate_basic()?;
        let account = msg.account()?;
        let signature = msg.signature_bytes()?;
        Self::ensure_sender(ctx, &account)?;

        let signer = self.existing_signer(&account)?;
        self.ensure_bonded(&account)?;

        let epoch = self.reader().epoch_number()? + 1;
        let hash = epoch_registration_hash(account.as_bytes(), epoch, self.chain_id);
        Self::verify(&signer, &hash, &signature)?;

        let mut batch = WriteBatch::new();
        batch.put_registration(epoch, &account, &signature)?;
        batch.commit(&mut self.store)?;

        debug!("[qc-18] {} registered for epoch {}", account, epoch);
        metrics::record_epoch_registration();
        Ok(())
    }

    fn do_change_params(&mut self, ctx: &TxContext, msg: MsgChangeParams) -> DaSignersResult<()> {
        msg.validate_basic()?;
        if ctx.sender != msg.authority || !self.authority.is_authorized(&msg.authority) {
            return Err(DaSignersError::Unauthorized {
                expected: self.authority.describe(),
                actual: ctx.sender.clone(),
            });
        }

        let mut batch = WriteBatch::new();
        batch.put_params(&msg.params)?;
        batch.commit(&mut self.store)?;

        info!(
            "[qc-18] Params updated at height {}: {:?}",
            ctx.block_height, msg.params
        );
        self.events.emit(DaSignersEvent::ParamsUpdated {
            block_height: ctx.block_height,
            params: msg.params,
        });
        Ok(())
    }
}

impl<S, L, E, A> DaSignersApi for DaSignersService<S, L, E, A>
where
    S: KeyValueStore,
    L: StakeLedger,
    E: EventSink,
    A: AuthorityCheck,
{
    fn register_signer(&mut self, ctx: &TxContext, msg: MsgRegisterSigner) -> DaSignersResult<()> {
        let result = self.do_register_signer(ctx, msg);
        Self::rejected("register_signer", result)
    }

    fn update_socket(&mut self, ctx: &TxContext, msg: MsgUpdateSocket) -> DaSignersResult<()> {
        let result = self.do_update_socket(ctx, msg);
        Self::rejected("update_socket", result)
    }

    fn register_next_epoch(
        &mut self,
        ctx: &TxContext,
        msg: MsgRegisterNextEpoch,
    ) -> DaSignersResult<()> {
        let result = self.do_register_next_epoch(ctx, msg);
        Self::rejected("register_next_epoch", result)
    }

    fn change_params(&mut self, ctx: &TxContext, msg: MsgChangeParams) -> DaSignersResult<()> {
        let result = self.do_change_params(ctx, msg);
        Self::rejected("change_params", result)
    }

    fn begin_block(&mut self, height: u64) -> DaSignersResult<Option<u64>> {
        let params = self.reader().params()?;
        let current = self.reader().epoch_number()?;

        // At most one epoch per block, however far the height has moved.
        let reached = height
            .checked_div(params.epoch_blocks)
            .ok_or(DaSignersError::ZeroEpochBlocks)?;
        if reached <= current {
            return Ok(None);
        }

        match self.rotate(height, current, &params) {
            Ok(epoch) => Ok(Some(epoch)),
            Err(e) => {
                error!(
                    "[qc-18] Epoch rotation aborted at height {}: {}",
                    height, e
                );
                Err(e)
            }
        }
    }

    fn signer(&self, account: &Account) -> DaSignersResult<Signer> {
        debug!("[qc-18] Query signer {}", account);
        self.existing_signer(account)
    }

    fn get_signers(&self, accounts: &[Account]) -> DaSignersResult<Vec<Signer>> {
        debug!("[qc-18] Query {} signers", accounts.len());
        accounts
            .iter()
            .map(|account| self.existing_signer(account))
            .collect()
    }

    fn is_signer(&self, account: &Account) -> DaSignersResult<bool> {
        self.reader().has_signer(account)
    }

    fn registered_epoch(&self, account: &Account, epoch: u64) -> DaSignersResult<bool> {
        Ok(self.reader().registration(epoch, account)?.is_some())
    }

    fn params(&self) -> DaSignersResult<Params> {
        self.reader().params()
    }

    fn epoch_number(&self) -> DaSignersResult<u64> {
        self.reader().epoch_number()
    }

    fn quorum_count(&self, epoch: u64) -> DaSignersResult<u64> {
        Ok(self.quorum_set(epoch)?.quorum_count())
    }

    fn quorum(&self, epoch: u64, quorum_id: u64) -> DaSignersResult<Quorum> {
        debug!("[qc-18] Query quorum {} of epoch {}", quorum_id, epoch);
        let set = self.quorum_set(epoch)?;
        let quorum_count = set.quorum_count();
        if quorum_id >= quorum_count {
            return Err(DaSignersError::QuorumIdOutOfBound {
                epoch,
                quorum_id,
                quorum_count,
            });
        }
        Ok(set.quorums[quorum_id as usize].clone())
    }

    fn quorum_row(&self, epoch: u64, quorum_id: u64, row_index: u64) -> DaSignersResult<Account> {
        let quorum = self.quorum(epoch, quorum_id)?;
        quorum
            .signers
            .get(row_index as usize)
            .copied()
            .ok_or(DaSignersError::RowIndexOutOfBound {
                row_index,
                encoded_slices: quorum.signers.len() as u64,
            })
    }

    fn aggregate_pubkey_g1(
        &self,
        epoch: u64,
        quorum_id: u64,
        bitmap: &[u8],
    ) -> DaSignersResult<AggregatePubkey> {
        let quorum = self.quorum(epoch, quorum_id)?;
        aggregate_quorum(&quorum, bitmap, |account| {
            let signer = self.existing_signer(account)?;
            deserialize_g1(&signer.pubkey_g1).map_err(|e| DaSignersError::InvalidPubkey {
                reason: format!("{}: {}", account, e),
            })
        })
    }

    fn export_genesis(&self) -> DaSignersResult<GenesisState> {
        let reader = self.reader();
        let epoch_number = reader.epoch_number()?;
        let quorums_by_epoch = (0..=epoch_number)
            .map(|epoch| self.quorum_set(epoch))
            .collect::<DaSignersResult<Vec<_>>>()?;

        Ok(GenesisState {
            params: reader.params()?,
            epoch_number,
            signers: reader.all_signers()?,
            quorums_by_epoch,
        })
    }
}
