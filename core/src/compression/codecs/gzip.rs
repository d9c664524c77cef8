//! Gzip members via flate2.
//!
//! Every chunk becomes its own gzip member; concatenated members are a valid
//! gzip file, which is what lets chunks compress independently and restore
//! through a plain multi-member decoder.

use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::compression::types::{CompressionError, Compressor};

pub struct GzipCompressor {
    level: Compression,
}

impl GzipCompressor {
    pub fn new(level: i32) -> Result<Box<dyn Compressor + Send>, CompressionError> {
        if !(0..=9).contains(&level) {
            return Err(CompressionError::UnsupportedLevel { codec: "gzip", level });
        }
        Ok(Box::new(Self { level: Compression::new(level as u32) }))
    }
}

impl Compressor for GzipCompressor {
    fn compress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        // Encode this chunk as its own gzip member (header + deflate + trailer).
        let mut enc = GzEncoder::new(Vec::new(), self.level);
        enc.write_all(input).map_err(|e| CompressionError::CodecProcess {
            codec: "gzip",
            msg: e.to_string(),
        })?;
        let member = enc.finish().map_err(|e| CompressionError::CodecProcess {
            codec: "gzip",
            msg: e.to_string(),
        })?;
        out.extend_from_slice(&member);
        Ok(())
    }
}
