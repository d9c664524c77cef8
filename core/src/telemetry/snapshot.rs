//! telemetry/snapshot.rs
//! Immutable, serializable result of one pipeline run.

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::StreamCounters;

/// Summary of a completed split/compress run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSnapshot {
    pub bytes_raw: u64,
    pub bytes_compressed: u64,
    pub chunks: u64,
    pub max_pending: usize,
    /// Parts produced by the downstream sink.
    pub parts: u64,
    /// True when the whole output fit in one part, which lets callers name
    /// the result without the part suffix.
    pub single_part: bool,
}

impl StreamSnapshot {
    pub fn from_counters(counters: &StreamCounters, parts: u64) -> Self {
        Self {
            bytes_raw: counters.bytes_raw,
            bytes_compressed: counters.bytes_compressed,
            chunks: counters.chunks_drained,
            max_pending: counters.max_pending,
            parts,
            single_part: parts == 1,
        }
    }

    /// Compressed-to-raw ratio, 1.0 for an empty run.
    pub fn ratio(&self) -> f64 {
        if self.bytes_raw == 0 {
            1.0
        } else {
            self.bytes_compressed as f64 / self.bytes_raw as f64
        }
    }
}
