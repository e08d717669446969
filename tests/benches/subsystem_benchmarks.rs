//! # Quantum-Chain Subsystem Benchmarks
//!
//! | Subsystem | Operation | Runs |
//! |-----------|-----------|------|
//! | qc-18 DA Signers | Quorum partition | once per epoch |
//! | qc-18 DA Signers | Bitmap aggregation | per blob attestation |
//! | qc-18 DA Signers | Registration verify | per registration tx |

use criterion::{criterion_group, criterion_main};
use qc_tests::benchmarks::qc_18_da_signers::{
    brutal_aggregate, brutal_partition, brutal_registration_verify,
};

criterion_group!(
    benches,
    brutal_partition,
    brutal_aggregate,
    brutal_registration_verify,
);

criterion_main!(benches);
