//! constants.rs
//! Tuning defaults for chunking, part naming, and restore buffering.
//! These are memory/throughput trade-offs, not correctness invariants.

/// Raw bytes accumulated before a chunk is handed to the worker pool.
pub const DEFAULT_CHUNK_SIZE: usize = 2 * 1024 * 1024;

/// Upper sanity bound on a configured chunk size.
pub const MAX_CHUNK_SIZE: usize = 256 * 1024 * 1024;

/// Default codec level forwarded to every worker.
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 6;

/// Default byte capacity of one part file (3.5 GiB).
pub const DEFAULT_PART_SIZE: u64 = 3_584 * 1024 * 1024;

/// Part capacity clamp for FAT-family destinations, which cap files at 4 GiB.
pub const FAT_PART_LIMIT: u64 = 3_900 * 1024 * 1024;

/// Width of the zero-padded numeric part suffix (`part_000`).
pub const PART_SUFFIX_WIDTH: usize = 3;

/// Conventional marker preceding the numeric suffix in part names.
pub const PART_MARKER: &str = "part_";

/// Copy buffer used by the pipeline drivers when pumping a reader.
pub const COPY_BUF_SIZE: usize = 1024 * 1024;

// Restore-side read buffering, picked from the total discovered input size.
pub const SOURCE_BUF_SMALL_INPUT: usize = 4 * 1024 * 1024;
pub const SOURCE_BUF_DEFAULT: usize = 1024 * 1024;
pub const SOURCE_BUF_LARGE_INPUT: usize = 256 * 1024;
pub const SMALL_INPUT_THRESHOLD: u64 = 64 * 1024 * 1024;
pub const LARGE_INPUT_THRESHOLD: u64 = 4 * 1024 * 1024 * 1024;
