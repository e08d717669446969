//! # Quorum Partitioner
//!
//! Splits the rows of an epoch's quorums among eligible signers in
//! proportion to their ballots.
//!
//! ## Algorithm
//!
//! 1. `quorum_count = min(max_quorums, ceil(total_ballots / encoded_slices))`
//! 2. Largest-remainder apportionment of `quorum_count * encoded_slices`
//!    rows. Leftover rows go to the largest fractional remainders, ties to
//!    the lower account.
//! 3. Every allotted row `k` of account `a` gets the sort key
//!    `keccak256(seed ‖ a ‖ k)`. Rows are ordered by key and cut into
//!    quorums of `encoded_slices` rows.
//!
//! The seed commits to the epoch and to every eligible registration
//! signature, so the layout is fixed only once registrations close and any
//! node recomputes it byte for byte.

use super::bn254::G1Bytes;
use super::entities::{Account, Quorum, QuorumSet};
use super::hash::{keccak256_concat, Hash};
use super::params::{Params, MAX_ROWS_PER_EPOCH};
use crate::error::{DaSignersError, DaSignersResult};
use std::cmp::Reverse;

/// Domain tag for the placement seed.
const PLACEMENT_TAG: &[u8] = b"QC18_DA_SIGNERS_ROW_PLACEMENT";

/// A signer eligible for the target epoch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub account: Account,
    pub ballots: u64,
    /// Registration signature for the target epoch
    pub registration: G1Bytes,
}

/// `min(max_quorums, ceil(total_ballots / encoded_slices))`
pub fn quorum_count(total_ballots: u64, params: &Params) -> DaSignersResult<u64> {
    if params.encoded_slices == 0 {
        return Err(DaSignersError::ZeroEncodedSlices);
    }
    Ok(total_ballots
        .div_ceil(params.encoded_slices)
        .min(params.max_quorums))
}

/// Sum of ballots, failing on overflow.
pub fn total_ballots(candidates: &[Candidate], epoch: u64) -> DaSignersResult<u64> {
    candidates.iter().try_fold(0u64, |acc, c| {
        acc.checked_add(c.ballots)
            .ok_or(DaSignersError::BallotOverflow { epoch })
    })
}

/// Largest-remainder apportionment of `total_rows` by ballots.
///
/// Returns one row count per candidate, in input order. The counts always
/// sum to `total_rows` when at least one candidate has ballots.
pub fn apportion_rows(candidates: &[Candidate], total: u64, total_rows: u64) -> Vec<u64> {
    if total == 0 {
        return vec![0; candidates.len()];
    }

    let total = total as u128;
    let mut rows = Vec::with_capacity(candidates.len());
    let mut remainders = Vec::with_capacity(candidates.len());
    let mut assigned = 0u64;

    for (i, c) in candidates.iter().enumerate() {
        let scaled = c.ballots as u128 * total_rows as u128;
        let share = (scaled / total) as u64;
        rows.push(share);
        remainders.push((scaled % total, i));
        assigned += share;
    }

    // Fewer leftover rows than candidates, so one pass suffices.
    let leftover = (total_rows - assigned) as usize;
    remainders.sort_by_key(|(rem, i)| (Reverse(*rem), candidates[*i].account));
    for (_, i) in remainders.into_iter().take(leftover) {
        rows[i] += 1;
    }

    rows
}

fn placement_seed(epoch: u64, candidates: &[Candidate]) -> Hash {
    let epoch_bytes = epoch.to_be_bytes();
    let mut parts: Vec<&[u8]> = Vec::with_capacity(2 + candidates.len() * 2);
    parts.push(PLACEMENT_TAG);
    parts.push(&epoch_bytes);
    for c in candidates {
        parts.push(c.account.as_bytes());
        parts.push(&c.registration);
    }
    keccak256_concat(&parts)
}

/// Build the quorum set for `epoch`.
///
/// Candidates without ballots are ignored. Zero total ballots yields an
/// empty quorum set.
pub fn partition(
    epoch: u64,
    mut candidates: Vec<Candidate>,
    params: &Params,
) -> DaSignersResult<QuorumSet> {
    candidates.retain(|c| c.ballots > 0);
    candidates.sort_by(|a, b| a.account.cmp(&b.account));

    let total = total_ballots(&candidates, epoch)?;
    let count = quorum_count(total, params)?;
    if count == 0 {
        return Ok(QuorumSet::default());
    }

    let total_rows = u128::from(count) * u128::from(params.encoded_slices);
    if total_rows > u128::from(MAX_ROWS_PER_EPOCH) {
        return Err(DaSignersError::RowLimitExceeded {
            epoch,
            rows: total_rows,
            limit: MAX_ROWS_PER_EPOCH,
        });
    }
    let total_rows = total_rows as u64;
    let rows = apportion_rows(&candidates, total, total_rows);
    let seed = placement_seed(epoch, &candidates);

    let mut keyed: Vec<(Hash, Account)> = Vec::with_capacity(total_rows as usize);
    for (c, &n) in candidates.iter().zip(rows.iter()) {
        for k in 0..n {
            let key = keccak256_concat(&[&seed[..], &c.account.0[..], &k.to_be_bytes()[..]]);
            keyed.push((key, c.account));
        }
    }
    keyed.sort_unstable();

    let quorums = keyed
        .chunks(params.encoded_slices as usize)
        .map(|chunk| Quorum {
            signers: chunk.iter().map(|(_, account)| *account).collect(),
        })
        .collect();

    Ok(QuorumSet { quorums })
}
