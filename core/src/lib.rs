//! partstream-core
//!
//! Pure Rust streaming split/compress/reassemble engine.
//! Feeds an unbounded byte stream through parallel chunk compression and
//! rolls the result across numbered, size-bounded part files; the reverse
//! path stitches the parts back into one continuous readable stream.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;

// Codec layer
pub mod compression;

// Split / compress / reassemble pipeline
pub mod stream;

// Counters and snapshots
pub mod telemetry;

pub use compression::{Codec, CompressionError, Compressor};
pub use stream::compressor::OrderedParallelCompressor;
pub use stream::parallelism::ParallelismProfile;
pub use stream::sink::{PartInfo, SegmentedSink};
pub use stream::source::SegmentedSource;
pub use stream::{ByteSink, CompressionConfig};
pub use telemetry::StreamSnapshot;
pub use types::StreamError;
