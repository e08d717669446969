//! # Integration Tests
//!
//! Multi-epoch flows driven only through the public API of
//! qc-18-da-signers.

pub mod flows;
