//! # Bitmap Aggregation
//!
//! Bit `r` of the bitmap (`bitmap[r / 8] >> (r % 8) & 1`) marks row `r` of a
//! quorum as attested. An operator counts once if any of its rows is set,
//! and then contributes all of its rows to `hit`.

use super::bn254::{aggregate_g1, serialize_g1};
use super::entities::{Account, AggregatePubkey, Quorum};
use crate::error::{DaSignersError, DaSignersResult};
use ark_bn254::G1Affine;
use bitvec::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Distinct operators with at least one set row, in account order.
pub fn attesting_operators(quorum: &Quorum, bitmap: &[u8]) -> DaSignersResult<BTreeSet<Account>> {
    let width = quorum.signers.len();
    let expected = width.div_ceil(8);
    if bitmap.len() != expected {
        return Err(DaSignersError::QuorumBitmapLengthMismatch {
            expected,
            actual: bitmap.len(),
        });
    }

    let bits = bitmap.view_bits::<Lsb0>();
    Ok(bits
        .iter_ones()
        .take_while(|row| *row < width)
        .map(|row| quorum.signers[row])
        .collect())
}

/// Aggregate the G1 keys of the operators attesting in `bitmap`.
///
/// `pubkey_of` resolves an operator's stored key.
pub fn aggregate_quorum<F>(
    quorum: &Quorum,
    bitmap: &[u8],
    mut pubkey_of: F,
) -> DaSignersResult<AggregatePubkey>
where
    F: FnMut(&Account) -> DaSignersResult<G1Affine>,
{
    let attesting = attesting_operators(quorum, bitmap)?;

    let mut rows: BTreeMap<Account, u64> = BTreeMap::new();
    for account in &quorum.signers {
        *rows.entry(*account).or_default() += 1;
    }

    let mut keys = Vec::with_capacity(attesting.len());
    let mut hit = 0u64;
    for account in &attesting {
        keys.push(pubkey_of(account)?);
        hit += rows.get(account).copied().unwrap_or_default();
    }

    Ok(AggregatePubkey {
        aggregate_pubkey_g1: serialize_g1(&aggregate_g1(keys.iter())),
        total: quorum.signers.len() as u64,
        hit,
    })
}
