//! stream/mod.rs
//! Split/compress/reassemble pipeline wiring.
//!
//! Backup path: producer bytes -> `OrderedParallelCompressor` ->
//! `SegmentedSink` -> numbered part files. Restore path: part files ->
//! `SegmentedSource` -> decoding reader -> consumer.

pub mod compressor;
pub mod parallelism;
pub mod pipeline;
pub mod sink;
pub mod source;
pub(crate) mod worker;

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::compression::{check_level, Codec};
use crate::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_COMPRESSION_LEVEL, MAX_CHUNK_SIZE};
use crate::types::StreamError;

/// Downstream byte sink that can be finalized once the stream ends.
///
/// The compressor drains ordered frames into this and calls `finish` from
/// its own `close`, so the whole backup pipeline tears down in one call.
pub trait ByteSink: Write {
    fn finish(&mut self) -> Result<(), StreamError>;
}

/// In-memory sink, used by tests and by callers that post-process the
/// compressed stream themselves.
impl ByteSink for Vec<u8> {
    fn finish(&mut self) -> Result<(), StreamError> {
        Ok(())
    }
}

/// Configuration surface of the parallel compressor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub codec: Codec,
    /// Level forwarded uniformly to every worker's codec instance.
    pub level: i32,
    /// Bytes accumulated before a chunk is submitted.
    pub chunk_size: usize,
    pub profile: parallelism::ParallelismProfile,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            codec: Codec::Gzip,
            level: DEFAULT_COMPRESSION_LEVEL,
            chunk_size: DEFAULT_CHUNK_SIZE,
            profile: parallelism::ParallelismProfile::default(),
        }
    }
}

impl CompressionConfig {
    pub fn validate(&self) -> Result<(), StreamError> {
        if self.chunk_size == 0 {
            return Err(StreamError::Config("chunk_size must be non-zero".into()));
        }
        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(StreamError::Config(format!(
                "chunk_size {} exceeds maximum {}",
                self.chunk_size, MAX_CHUNK_SIZE
            )));
        }
        self.profile.validate()?;
        check_level(self.codec, self.level)?;
        Ok(())
    }
}
