//! Per-call caches: live-cart snapshots and processed-call bookkeeping.
//!
//! Both are built on [`BoundedTtlMap`], an explicit bounded key-value store
//! with oldest-entry eviction on overflow and a time-based validity check
//! on read. Every operation takes the current time as a parameter, so
//! nothing here owns a timer and retention behavior is testable without
//! real time passing.

pub mod snapshot;
pub mod store;

pub use snapshot::{build_snapshot, CartStore, ProcessedCalls};
pub use store::BoundedTtlMap;
