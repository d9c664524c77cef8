//! compression/mod.rs
//! Chunk-at-a-time compression behind a uniform trait seam.
//!
//! Every chunk compresses to a complete, self-contained container frame
//! (gzip member or zstd frame). Concatenating frames byte-for-byte yields a
//! stream that standard decoders read as the concatenation of the original
//! chunks, which is what makes parallel compression order-safe.

pub mod codecs;
pub mod registry;
pub mod types;

pub use registry::{check_level, create_compressor, decoding_reader, Codec};
pub use types::{CompressionError, Compressor};
