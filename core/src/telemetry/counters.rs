//! telemetry/counters.rs
//! Counters mutated only on the controlling thread.
//!
//! Workers never touch these, which keeps the pipeline free of locks and
//! atomics: submission and draining both happen on the thread that owns the
//! compressor.

/// Counters collected during split/compress processing.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct StreamCounters {
    /// Raw bytes accepted by the compressor.
    pub bytes_raw: u64,
    /// Compressed bytes handed to the downstream sink.
    pub bytes_compressed: u64,
    /// Chunks submitted to the worker pool.
    pub chunks_submitted: u64,
    /// Chunks drained, in order, onto the sink.
    pub chunks_drained: u64,
    /// Peak length of the pending-results FIFO.
    pub max_pending: usize,
}

impl StreamCounters {
    pub fn add_raw(&mut self, len: usize) {
        self.bytes_raw += len as u64;
    }

    pub fn add_submitted(&mut self) {
        self.chunks_submitted += 1;
    }

    /// Record one drained frame written downstream.
    pub fn add_drained(&mut self, frame_len: usize) {
        self.chunks_drained += 1;
        self.bytes_compressed += frame_len as u64;
    }

    /// Track the high-water mark of the pending FIFO.
    pub fn note_pending(&mut self, pending: usize) {
        if pending > self.max_pending {
            self.max_pending = pending;
        }
    }
}
