//! Zstd frames via the zstd bulk API.
//!
//! `zstd::bulk::compress` emits one complete frame per call; concatenated
//! frames decode sequentially with the multi-frame streaming decoder.

use crate::compression::types::{CompressionError, Compressor};

pub struct ZstdCompressor {
    level: i32,
}

impl ZstdCompressor {
    pub fn new(level: i32) -> Result<Box<dyn Compressor + Send>, CompressionError> {
        if !(1..=21).contains(&level) {
            return Err(CompressionError::UnsupportedLevel { codec: "zstd", level });
        }
        Ok(Box::new(Self { level }))
    }
}

impl Compressor for ZstdCompressor {
    fn compress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let frame = ::zstd::bulk::compress(input, self.level).map_err(|e| {
            CompressionError::CodecProcess { codec: "zstd", msg: e.to_string() }
        })?;
        out.extend_from_slice(&frame);
        Ok(())
    }
}
