//! # Test Fixtures
//!
//! In-memory DA signer node and deterministic operators.

use ark_bn254::Fr;
use qc_18_da_signers::adapters::{
    FixedAuthority, InMemoryEventSink, InMemoryKVStore, InMemoryStakeLedger,
};
use qc_18_da_signers::domain::bn254::{epoch_registration_hash, pubkey_registration_hash};
use qc_18_da_signers::domain::stake_for_ballots;
use qc_18_da_signers::{
    Account, DaSignersApi, DaSignersConfig, DaSignersResult, DaSignersService, Keypair,
    MsgRegisterNextEpoch, MsgRegisterSigner, Params, Signer, TxContext,
};
use std::sync::Arc;

/// Node wired with in-memory adapters.
pub type TestNode = DaSignersService<
    InMemoryKVStore,
    Arc<InMemoryStakeLedger>,
    Arc<InMemoryEventSink>,
    FixedAuthority,
>;

/// Install a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Operator with a deterministic key pair.
#[derive(Clone, Debug)]
pub struct TestOperator {
    pub account: Account,
    pub keypair: Keypair,
}

impl TestOperator {
    /// Operator `index`, with secret `index + 1`.
    pub fn new(index: u32) -> Self {
        let mut raw = [0u8; 20];
        raw[0] = 0xda;
        raw[16..].copy_from_slice(&index.to_be_bytes());
        let keypair = Keypair::from_secret(Fr::from(index as u64 + 1))
            .expect("secret is never zero");
        Self {
            account: Account(raw),
            keypair,
        }
    }

    pub fn ctx(&self, height: u64) -> TxContext {
        TxContext::new(height, self.account.to_string())
    }

    pub fn signer(&self) -> Signer {
        Signer {
            account: self.account,
            socket: format!("da-{}.example:32001", self.account),
            pubkey_g1: self.keypair.pubkey_g1_bytes(),
            pubkey_g2: self.keypair.pubkey_g2_bytes(),
        }
    }

    pub fn register_msg(&self, chain_id: u64) -> MsgRegisterSigner {
        let hash = pubkey_registration_hash(self.account.as_bytes(), chain_id);
        MsgRegisterSigner::new(self.signer(), self.keypair.sign_bytes(&hash))
    }

    pub fn next_epoch_msg(&self, epoch: u64, chain_id: u64) -> MsgRegisterNextEpoch {
        let hash = epoch_registration_hash(self.account.as_bytes(), epoch, chain_id);
        MsgRegisterNextEpoch {
            account: self.account.to_string(),
            signature: self.keypair.sign_bytes(&hash).to_vec(),
        }
    }
}

/// A node plus handles on its stake ledger and event sink.
pub struct TestNetwork {
    pub node: TestNode,
    pub stake: Arc<InMemoryStakeLedger>,
    pub events: Arc<InMemoryEventSink>,
    pub config: DaSignersConfig,
    pub height: u64,
}

impl TestNetwork {
    pub fn new(params: Params) -> DaSignersResult<Self> {
        let mut config = DaSignersConfig::default();
        config.genesis.params = params;
        let stake = Arc::new(InMemoryStakeLedger::new());
        let events = Arc::new(InMemoryEventSink::new());
        let node = DaSignersService::new(
            &config,
            InMemoryKVStore::new(),
            stake.clone(),
            events.clone(),
            config.authority_check(),
        )?;
        Ok(Self {
            node,
            stake,
            events,
            config,
            height: 1,
        })
    }

    pub fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    pub fn bond_votes(&self, operator: &TestOperator, votes: u64) -> DaSignersResult<()> {
        let params = self.node.params()?;
        self.stake
            .set_bonded(operator.account, stake_for_ballots(votes, &params));
        Ok(())
    }

    /// Bond `votes`, register the signer and register for the next epoch.
    pub fn onboard(&mut self, operator: &TestOperator, votes: u64) -> DaSignersResult<()> {
        self.bond_votes(operator, votes)?;
        let ctx = operator.ctx(self.height);
        self.node
            .register_signer(&ctx, operator.register_msg(self.chain_id()))?;
        self.register_next(operator)
    }

    pub fn register_next(&mut self, operator: &TestOperator) -> DaSignersResult<()> {
        let epoch = self.node.epoch_number()? + 1;
        let ctx = operator.ctx(self.height);
        self.node
            .register_next_epoch(&ctx, operator.next_epoch_msg(epoch, self.chain_id()))
    }

    /// Run the block hook for every height up to and including `height`
    /// that could change state (the first block of each epoch).
    pub fn advance_to(&mut self, height: u64) -> DaSignersResult<Vec<u64>> {
        let epoch_blocks = self.node.params()?.epoch_blocks;
        let mut rotations = Vec::new();
        while self.height < height {
            let next_boundary = (self.height / epoch_blocks + 1) * epoch_blocks;
            self.height = next_boundary.min(height);
            if let Some(epoch) = self.node.begin_block(self.height)? {
                rotations.push(epoch);
            }
        }
        Ok(rotations)
    }
}
