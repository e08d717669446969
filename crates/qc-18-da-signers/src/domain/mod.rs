//! # Domain Layer
//!
//! Pure logic: curve primitives, entities, ballot conversion, the quorum
//! partitioner and bitmap aggregation. No I/O.

pub mod aggregation;
pub mod ballots;
pub mod bn254;
pub mod entities;
pub mod genesis;
pub mod hash;
pub mod params;
pub mod partition;

pub use aggregation::{aggregate_quorum, attesting_operators};
pub use ballots::{ballots_for_stake, stake_for_ballots};
pub use bn254::{G1Bytes, G2Bytes, Keypair, PointError};
pub use entities::{Account, AggregatePubkey, Quorum, QuorumSet, Registration, Signer};
pub use genesis::GenesisState;
pub use params::{Params, BONDED_CONVERSION_RATE, MAX_ROWS_PER_EPOCH};
pub use partition::{partition, Candidate};
