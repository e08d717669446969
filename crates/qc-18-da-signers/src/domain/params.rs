//! Governance-controlled parameters.

use crate::error::{DaSignersError, DaSignersResult};
use serde::{Deserialize, Serialize};

/// Staking base units per native vote unit (10^18).
pub const BONDED_CONVERSION_RATE: u128 = 1_000_000_000_000_000_000;

/// Upper bound on `max_quorums * encoded_slices`, the rows placed per epoch.
pub const MAX_ROWS_PER_EPOCH: u64 = 1 << 20;

/// Module parameters. Every field must be positive and one epoch places at
/// most [`MAX_ROWS_PER_EPOCH`] rows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Stake (in vote units) per ballot
    pub tokens_per_vote: u64,
    /// Cap on ballots per signer
    pub max_votes_per_signer: u64,
    /// Cap on quorums per epoch
    pub max_quorums: u64,
    /// Epoch length in blocks
    pub epoch_blocks: u64,
    /// Rows per quorum
    pub encoded_slices: u64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            tokens_per_vote: 10,
            max_votes_per_signer: 1024,
            max_quorums: 10,
            epoch_blocks: 5760,
            encoded_slices: 3072,
        }
    }
}

impl Params {
    pub fn validate(&self) -> DaSignersResult<()> {
        let fields = [
            ("tokens_per_vote", self.tokens_per_vote),
            ("max_votes_per_signer", self.max_votes_per_signer),
            ("max_quorums", self.max_quorums),
            ("epoch_blocks", self.epoch_blocks),
            ("encoded_slices", self.encoded_slices),
        ];
        for (name, value) in fields {
            if value == 0 {
                return Err(DaSignersError::InvalidParams {
                    reason: format!("{} must be positive", name),
                });
            }
        }

        match self.max_quorums.checked_mul(self.encoded_slices) {
            Some(rows) if rows <= MAX_ROWS_PER_EPOCH => Ok(()),
            _ => Err(DaSignersError::InvalidParams {
                reason: format!(
                    "max_quorums * encoded_slices must not exceed {}",
                    MAX_ROWS_PER_EPOCH
                ),
            }),
        }
    }

    /// Bytes needed for a bitmap over one quorum.
    pub fn bitmap_len(&self) -> usize {
        self.encoded_slices.div_ceil(8) as usize
    }

    /// First block height of `epoch`.
    pub fn epoch_start(&self, epoch: u64) -> u64 {
        epoch.saturating_mul(self.epoch_blocks)
    }
}
