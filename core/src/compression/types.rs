//! compression/types.rs
//! Compressor trait and codec error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressionError {
    /// Level outside the codec's accepted range, rejected at construction.
    #[error("codec {codec} does not support level {level}")]
    UnsupportedLevel { codec: &'static str, level: i32 },

    #[error("codec {codec} init failed: {msg}")]
    CodecInit { codec: &'static str, msg: String },

    #[error("codec {codec} failed: {msg}")]
    CodecProcess { codec: &'static str, msg: String },
}

// Require Send so trait objects can cross thread boundaries.
pub trait Compressor: Send {
    /// Compress one chunk into `out` as a complete, self-contained frame.
    ///
    /// The frame must carry its own container header and trailer and depend
    /// on no state from neighboring chunks: concatenated frames decode, read
    /// sequentially from the start, into the concatenated original chunks.
    fn compress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError>;
}
