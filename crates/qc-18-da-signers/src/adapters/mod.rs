//! # Adapters
//!
//! In-memory implementations of the outbound ports.

pub mod authority;
pub mod event_sink;
pub mod memory_store;
pub mod stake;

pub use authority::FixedAuthority;
pub use event_sink::{InMemoryEventSink, NoopEventSink};
pub use memory_store::InMemoryKVStore;
pub use stake::InMemoryStakeLedger;
