//! telemetry/mod.rs
//! Mutable counters collected while a pipeline runs, folded into an
//! immutable snapshot at the end.

pub mod counters;
pub mod snapshot;

pub use counters::StreamCounters;
pub use snapshot::StreamSnapshot;
