//! stream/parallelism.rs
//! Worker sizing and the pending-results bound.

use serde::{Deserialize, Serialize};

use crate::types::StreamError;

/// Parallelism configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallelismProfile {
    /// Compression worker threads.
    pub workers: usize,
    /// Pending (submitted, not yet drained) results allowed before the
    /// producer blocks on the FIFO head. Bounds memory to roughly this many
    /// chunks of raw input plus their in-flight compressed output.
    pub pending_limit: usize,
}

impl Default for ParallelismProfile {
    fn default() -> Self {
        let workers = num_cpus::get().max(1);
        Self { workers, pending_limit: workers * 2 }
    }
}

impl ParallelismProfile {
    pub fn single_threaded() -> Self {
        Self { workers: 1, pending_limit: 2 }
    }

    /// Fixed worker count with the conventional 2x pending bound.
    pub fn with_workers(workers: usize) -> Self {
        Self { workers, pending_limit: workers.saturating_mul(2).max(1) }
    }

    /// Size the pending bound from available memory.
    ///
    /// Budget = `mem_fraction` of currently available memory; each pending
    /// chunk is assumed to cost about one `chunk_size` of raw input plus its
    /// compressed output. The result is clamped to `hard_cap`.
    pub fn dynamic(chunk_size: usize, mem_fraction: f64, hard_cap: usize) -> Self {
        let cores = num_cpus::get();
        let workers = cores.saturating_sub(1).max(1); // leave one core free

        let mut sys = sysinfo::System::new();
        sys.refresh_memory();
        let budget = (sys.available_memory() as f64 * mem_fraction) as u64;

        let per_chunk = (chunk_size as u64).saturating_mul(2).max(1);
        let pending_limit = (budget / per_chunk).clamp(1, hard_cap as u64) as usize;

        tracing::debug!(workers, pending_limit, "dynamic parallelism profile");
        Self { workers, pending_limit }
    }

    pub fn validate(&self) -> Result<(), StreamError> {
        if self.workers == 0 {
            return Err(StreamError::Config("worker count must be non-zero".into()));
        }
        if self.pending_limit == 0 {
            return Err(StreamError::Config("pending_limit must be non-zero".into()));
        }
        Ok(())
    }
}
