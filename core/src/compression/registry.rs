//! compression/registry.rs
//! Codec capability enum and factory functions.
//!
//! The codec is resolved once at configuration time and injected into the
//! pipeline; nothing probes for codec availability inside hot paths.

use std::fmt;
use std::io::Read;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::compression::codecs::{gzip, zstd};
use crate::compression::types::{CompressionError, Compressor};

/// Codecs whose frames concatenate into a valid stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Codec {
    Gzip,
    Zstd,
}

impl Codec {
    pub fn name(self) -> &'static str {
        match self {
            Codec::Gzip => "gzip",
            Codec::Zstd => "zstd",
        }
    }

    /// Conventional file extension for archives in this codec.
    pub fn extension(self) -> &'static str {
        match self {
            Codec::Gzip => "gz",
            Codec::Zstd => "zst",
        }
    }

    pub fn default_level(self) -> i32 {
        match self {
            Codec::Gzip => 6,
            Codec::Zstd => 3,
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Codec {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gzip" | "gz" => Ok(Codec::Gzip),
            "zstd" | "zst" => Ok(Codec::Zstd),
            other => Err(CompressionError::CodecInit {
                codec: "registry",
                msg: format!("unknown codec `{other}`"),
            }),
        }
    }
}

/// Validate a level against the codec's accepted range.
pub fn check_level(codec: Codec, level: i32) -> Result<(), CompressionError> {
    let ok = match codec {
        Codec::Gzip => (0..=9).contains(&level),
        Codec::Zstd => (1..=21).contains(&level),
    };
    if ok {
        Ok(())
    } else {
        Err(CompressionError::UnsupportedLevel { codec: codec.name(), level })
    }
}

/// Build one chunk compressor. Each worker owns its own instance.
pub fn create_compressor(
    codec: Codec,
    level: i32,
) -> Result<Box<dyn Compressor + Send>, CompressionError> {
    check_level(codec, level)?;
    match codec {
        Codec::Gzip => gzip::GzipCompressor::new(level),
        Codec::Zstd => zstd::ZstdCompressor::new(level),
    }
}

/// Wrap a reader of concatenated frames in the matching streaming decoder.
///
/// Both decoders continue across frame boundaries, so the whole restore
/// stream reads as one contiguous byte sequence.
pub fn decoding_reader<R: Read + 'static>(
    codec: Codec,
    input: R,
) -> Result<Box<dyn Read>, CompressionError> {
    match codec {
        Codec::Gzip => Ok(Box::new(flate2::read::MultiGzDecoder::new(input))),
        Codec::Zstd => {
            let decoder = ::zstd::stream::read::Decoder::new(input).map_err(|e| {
                CompressionError::CodecInit { codec: "zstd", msg: e.to_string() }
            })?;
            Ok(Box::new(decoder))
        }
    }
}
