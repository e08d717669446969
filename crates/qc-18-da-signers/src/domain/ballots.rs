//! Stake-to-ballot conversion.

use super::params::{Params, BONDED_CONVERSION_RATE};

/// Ballots earned by `bonded_stake` (in staking base units).
///
/// `min(max_votes_per_signer, bonded_stake / (tokens_per_vote * 10^18))`.
/// No stake yields zero ballots.
pub fn ballots_for_stake(bonded_stake: u128, params: &Params) -> u64 {
    let per_ballot = (params.tokens_per_vote as u128).saturating_mul(BONDED_CONVERSION_RATE);
    if per_ballot == 0 {
        return 0;
    }
    let ballots = bonded_stake / per_ballot;
    ballots.min(params.max_votes_per_signer as u128) as u64
}

/// Stake worth exactly `votes` ballots. Inverse of [`ballots_for_stake`]
/// below the cap.
pub fn stake_for_ballots(votes: u64, params: &Params) -> u128 {
    (votes as u128)
        .saturating_mul(params.tokens_per_vote as u128)
        .saturating_mul(BONDED_CONVERSION_RATE)
}
