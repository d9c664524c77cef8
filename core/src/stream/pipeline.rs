//! stream/pipeline.rs
//! Convenience drivers wiring the backup and restore paths end to end.

use std::io::{Read, Write};

use crate::compression::{registry, Codec};
use crate::constants::COPY_BUF_SIZE;
use crate::stream::compressor::OrderedParallelCompressor;
use crate::stream::sink::SegmentedSink;
use crate::stream::source::SegmentedSource;
use crate::stream::CompressionConfig;
use crate::telemetry::StreamSnapshot;
use crate::types::StreamError;

/// Pump `input` through parallel compression into `sink`.
///
/// The producer is any sequential reader (typically a tar serializer); this
/// driver owns the copy loop, the compressor teardown, and the snapshot.
pub fn run_split_compress<R: Read>(
    mut input: R,
    sink: SegmentedSink,
    config: &CompressionConfig,
) -> Result<StreamSnapshot, StreamError> {
    let mut compressor = OrderedParallelCompressor::new(sink, config)?;

    // Pump in pieces no larger than one chunk so a full accumulation buffer
    // is handed off at the configured chunk size, not at the copy size.
    let mut buf = vec![0u8; COPY_BUF_SIZE.min(config.chunk_size)];
    loop {
        let n = input.read(&mut buf)?;
        if n == 0 {
            break;
        }
        compressor.write_bytes(&buf[..n])?;
    }
    compressor.close()?;

    let snapshot = StreamSnapshot::from_counters(compressor.counters(), compressor.sink().part_count());
    tracing::debug!(
        parts = snapshot.parts,
        bytes_raw = snapshot.bytes_raw,
        bytes_compressed = snapshot.bytes_compressed,
        "split/compress finished"
    );
    Ok(snapshot)
}

/// Stitch the parts matching `pattern` back together, decode the frame
/// stream, and copy the raw bytes into `out`. Returns the raw byte count.
pub fn run_concat_decompress<W: Write>(
    pattern: &str,
    codec: Codec,
    mut out: W,
) -> Result<u64, StreamError> {
    let source = SegmentedSource::open(pattern)?;
    tracing::debug!(parts = source.parts().len(), total = source.total_len(), "restore started");

    let mut decoder = registry::decoding_reader(codec, source)?;
    let bytes = std::io::copy(&mut decoder, &mut out)?;

    tracing::debug!(bytes, "restore finished");
    Ok(bytes)
}
