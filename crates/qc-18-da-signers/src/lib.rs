//! # qc-18-da-signers
//!
//! Epoch and quorum assignment engine for the data-availability signer
//! committee.
//!
//! ## Overview
//!
//! This subsystem provides:
//! - **Signer Registry**: operators register a BN254 key pair with a proof of
//!   ownership, and re-register every epoch to declare availability
//! - **Ballots**: bonded stake is converted to integer ballots under caps
//! - **Quorum Partitioner**: rows of one or more quorums are apportioned to
//!   operators by ballots and placed in a verifiable pseudo-random order
//! - **Epoch Rotation**: driven from the block hook, one epoch per block
//! - **Aggregation**: aggregate G1 key and row weight for a bitmap of
//!   attesting rows
//!
//! ## Architecture
//!
//! ```text
//! Tx router ──Msg*──→ DaSignersService ──→ KeyValueStore
//!                          │    ↑
//! Block hook ─begin_block──┘    └── StakeLedger (bonded stake)
//!                          │
//!                          └── EventSink (update_signer, update_params, new_epoch)
//! ```
//!
//! ## Epoch State Machine
//!
//! ```text
//! [Idle(e)] ──height / epoch_blocks > e──→ [Rotating] ──commit quorums(e+1)──→ [Idle(e+1)]
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use qc_18_da_signers::{DaSignersConfig, DaSignersService};
//! use qc_18_da_signers::adapters::{InMemoryEventSink, InMemoryKVStore, InMemoryStakeLedger};
//! use qc_18_da_signers::ports::inbound::DaSignersApi;
//!
//! let config = DaSignersConfig::from_env()?;
//! let mut service = DaSignersService::new(
//!     &config,
//!     InMemoryKVStore::new(),
//!     InMemoryStakeLedger::new(),
//!     InMemoryEventSink::new(),
//!     config.authority_check(),
//! )?;
//!
//! service.begin_block(height)?;
//! let agg = service.aggregate_pubkey_g1(epoch, 0, &bitmap)?;
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod messages;
pub mod metrics;
pub mod ports;
pub mod service;
pub mod store;

pub use config::DaSignersConfig;
pub use domain::{
    Account, AggregatePubkey, GenesisState, Keypair, Params, Quorum, QuorumSet, Registration,
    Signer, BONDED_CONVERSION_RATE,
};
pub use error::{DaSignersError, DaSignersResult, ErrorKind};
pub use events::DaSignersEvent;
pub use messages::{MsgChangeParams, MsgRegisterNextEpoch, MsgRegisterSigner, MsgUpdateSocket};
pub use ports::inbound::{DaSignersApi, TxContext};
pub use service::DaSignersService;
