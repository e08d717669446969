//! # QC-18 DA Signers Benchmarks
//!
//! Hot paths of the epoch pipeline:
//! - Quorum partitioning at rotation, up to thousands of candidates
//! - Bitmap aggregation over a full-width quorum
//! - Registration signature verification (one pairing check)
//!
//! Brutal Conditions:
//! - Maximum quorum count with default-width quorums
//! - Skewed ballot distributions hitting the per-signer cap

use crate::fixtures::TestOperator;
use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use qc_18_da_signers::domain::bn254::{
    deserialize_g1, deserialize_g2, epoch_registration_hash, verify_signature,
};
use qc_18_da_signers::domain::{aggregate_quorum, partition, Candidate};
use qc_18_da_signers::{Account, DaSignersError, Params};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::time::Duration;

/// Random candidates with ballots in `1..=max_votes`.
fn generate_candidates(count: usize, max_votes: u64, rng: &mut StdRng) -> Vec<Candidate> {
    (0..count)
        .map(|_| {
            let mut account = [0u8; 20];
            rng.fill(&mut account);
            let mut registration = [0u8; 64];
            rng.fill(&mut registration[..]);
            Candidate {
                account: Account(account),
                ballots: rng.gen_range(1..=max_votes),
                registration,
            }
        })
        .collect()
}

pub fn brutal_partition(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-18-partition");
    group.measurement_time(Duration::from_secs(10));

    let params = Params::default();
    let mut rng = StdRng::seed_from_u64(18);

    for size in [10usize, 100, 1_000, 5_000] {
        let candidates = generate_candidates(size, params.max_votes_per_signer, &mut rng);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::new("partition_candidates", size),
            &candidates,
            |b, candidates| {
                b.iter(|| black_box(partition(1, candidates.clone(), &params).ok()))
            },
        );
    }

    group.finish();
}

pub fn brutal_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-18-aggregate");

    let params = Params {
        max_quorums: 1,
        ..Params::default()
    };
    let operators: Vec<TestOperator> = (0..64).map(TestOperator::new).collect();
    let mut rng = StdRng::seed_from_u64(7);
    let candidates: Vec<Candidate> = operators
        .iter()
        .map(|op| Candidate {
            account: op.account,
            ballots: rng.gen_range(1..=params.max_votes_per_signer),
            registration: [0u8; 64],
        })
        .collect();
    let keys: HashMap<Account, _> = operators
        .iter()
        .map(|op| (op.account, op.keypair.pubkey_g1))
        .collect();

    let set = match partition(1, candidates, &params) {
        Ok(set) => set,
        Err(e) => panic!("partition failed: {}", e),
    };
    let quorum = &set.quorums[0];
    let full = vec![0xffu8; params.bitmap_len()];
    let half: Vec<u8> = (0..params.bitmap_len())
        .map(|i| if i % 2 == 0 { 0xff } else { 0x00 })
        .collect();

    for (name, bitmap) in [("full_bitmap", &full), ("half_bitmap", &half)] {
        group.bench_function(name, |b| {
            b.iter(|| {
                black_box(aggregate_quorum(quorum, bitmap, |account| {
                    keys.get(account)
                        .copied()
                        .ok_or(DaSignersError::SignerNotFound {
                            account: account.to_string(),
                        })
                }))
            })
        });
    }

    group.finish();
}

pub fn brutal_registration_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-18-registration-verify");

    let op = TestOperator::new(1);
    let hash = epoch_registration_hash(op.account.as_bytes(), 5, 8888);
    let signature = op.keypair.sign(&hash);
    let pubkey_g1 = deserialize_g1(&op.keypair.pubkey_g1_bytes()).ok();
    let pubkey_g2 = deserialize_g2(&op.keypair.pubkey_g2_bytes()).ok();

    group.bench_function("hash_to_curve", |b| {
        b.iter(|| black_box(epoch_registration_hash(op.account.as_bytes(), 5, 8888)))
    });

    if let (Some(g1), Some(g2)) = (pubkey_g1, pubkey_g2) {
        group.bench_function("verify_signature", |b| {
            b.iter(|| black_box(verify_signature(&g1, &g2, &hash, &signature)))
        });
    }

    group.finish();
}
