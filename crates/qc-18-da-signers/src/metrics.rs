//! # DA Signers Metrics
//!
//! Prometheus metrics, enabled with the `metrics` feature:
//! ```toml
//! qc-18-da-signers = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `da_signers_registered_total` - Counter of signers registered
//! - `da_signers_epoch_registrations_total` - Counter of next-epoch registrations
//! - `da_signers_rejected_total` - Counter of rejected messages (by reason)
//! - `da_signers_rotations_total` - Counter of epoch rotations
//! - `da_signers_epoch_number` - Gauge of the current epoch
//! - `da_signers_quorum_count` - Gauge of quorums in the current epoch

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, IntCounter,
    IntCounterVec, IntGauge,
};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref SIGNERS_REGISTERED: IntCounter = register_int_counter!(
        "da_signers_registered_total",
        "Total number of DA signers registered"
    )
    .expect("Failed to create SIGNERS_REGISTERED metric");

    pub static ref EPOCH_REGISTRATIONS: IntCounter = register_int_counter!(
        "da_signers_epoch_registrations_total",
        "Total number of next-epoch registrations"
    )
    .expect("Failed to create EPOCH_REGISTRATIONS metric");

    /// Rejected messages, labeled by reason
    pub static ref MESSAGES_REJECTED: IntCounterVec = register_int_counter_vec!(
        "da_signers_rejected_total",
        "Total number of rejected DA signer messages",
        &["reason"]
    )
    .expect("Failed to create MESSAGES_REJECTED metric");

    pub static ref ROTATIONS: IntCounter = register_int_counter!(
        "da_signers_rotations_total",
        "Total number of epoch rotations"
    )
    .expect("Failed to create ROTATIONS metric");

    pub static ref EPOCH_NUMBER: IntGauge = register_int_gauge!(
        "da_signers_epoch_number",
        "Current DA signer epoch"
    )
    .expect("Failed to create EPOCH_NUMBER metric");

    pub static ref QUORUM_COUNT: IntGauge = register_int_gauge!(
        "da_signers_quorum_count",
        "Quorums in the current epoch"
    )
    .expect("Failed to create QUORUM_COUNT metric");
}

#[cfg(feature = "metrics")]
pub fn record_signer_registered() {
    SIGNERS_REGISTERED.inc();
}

#[cfg(feature = "metrics")]
pub fn record_epoch_registration() {
    EPOCH_REGISTRATIONS.inc();
}

#[cfg(feature = "metrics")]
pub fn record_rejected(reason: &str) {
    MESSAGES_REJECTED.with_label_values(&[reason]).inc();
}

/// Record a rotation into `epoch` with `quorum_count` quorums
#[cfg(feature = "metrics")]
pub fn record_rotation(epoch: u64, quorum_count: u64) {
    ROTATIONS.inc();
    EPOCH_NUMBER.set(epoch as i64);
    QUORUM_COUNT.set(quorum_count as i64);
}

#[cfg(not(feature = "metrics"))]
pub fn record_signer_registered() {}

#[cfg(not(feature = "metrics"))]
pub fn record_epoch_registration() {}

#[cfg(not(feature = "metrics"))]
pub fn record_rejected(_reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_rotation(_epoch: u64, _quorum_count: u64) {}
