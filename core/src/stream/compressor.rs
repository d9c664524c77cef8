//! stream/compressor.rs
//! Turns a serial byte stream into a serial stream of independently
//! compressed frames using a bounded worker pool.
//!
//! Chunks are submitted in input order; each submission's result channel is
//! queued in a FIFO, and output is produced only by draining that FIFO from
//! the head. The drain structure exposes nothing but head-removal, so output
//! order cannot depend on worker completion order.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::mem;

use bytes::Bytes;
use crossbeam::channel::{bounded, Receiver};

use crate::compression::{registry, CompressionError, Compressor};
use crate::stream::worker::{ChunkJob, ChunkOutcome, WorkerPool};
use crate::stream::{ByteSink, CompressionConfig};
use crate::telemetry::StreamCounters;
use crate::types::StreamError;

/// Parallel chunk compressor writing ordered frames to a downstream sink.
///
/// Output byte order is always identical to serial compression of the same
/// input, regardless of worker count or per-chunk completion latency.
pub struct OrderedParallelCompressor<W: ByteSink> {
    sink: W,
    chunk_size: usize,
    pending_limit: usize,
    buf: Vec<u8>,
    pool: WorkerPool,
    pending: VecDeque<Receiver<ChunkOutcome>>,
    next_seq: u64,
    counters: StreamCounters,
    closed: bool,
    aborted: bool,
}

impl<W: ByteSink> std::fmt::Debug for OrderedParallelCompressor<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderedParallelCompressor")
            .field("chunk_size", &self.chunk_size)
            .field("pending_limit", &self.pending_limit)
            .field("next_seq", &self.next_seq)
            .field("closed", &self.closed)
            .field("aborted", &self.aborted)
            .finish_non_exhaustive()
    }
}

impl<W: ByteSink> OrderedParallelCompressor<W> {
    /// Build a compressor whose workers run the configured codec.
    pub fn new(sink: W, config: &CompressionConfig) -> Result<Self, StreamError> {
        let codec = config.codec;
        let level = config.level;
        Self::with_factory(sink, config, move || registry::create_compressor(codec, level))
    }

    /// Build a compressor from a custom per-worker compressor factory.
    ///
    /// Each worker owns one instance produced by `make_compressor`.
    pub fn with_factory(
        sink: W,
        config: &CompressionConfig,
        make_compressor: impl FnMut() -> Result<Box<dyn Compressor + Send>, CompressionError>,
    ) -> Result<Self, StreamError> {
        config.validate()?;
        let pool = WorkerPool::spawn(config.profile.workers, make_compressor)?;
        Ok(Self {
            sink,
            chunk_size: config.chunk_size,
            pending_limit: config.profile.pending_limit,
            buf: Vec::with_capacity(config.chunk_size),
            pool,
            pending: VecDeque::new(),
            next_seq: 0,
            counters: StreamCounters::default(),
            closed: false,
            aborted: false,
        })
    }

    /// Append raw bytes; submits one chunk whenever the accumulation buffer
    /// reaches the configured chunk size.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<(), StreamError> {
        if self.aborted {
            return Err(StreamError::Pipeline("stream aborted"));
        }
        if self.closed {
            return Err(StreamError::Pipeline("write to closed compressor"));
        }
        self.buf.extend_from_slice(data);
        self.counters.add_raw(data.len());
        if self.buf.len() >= self.chunk_size {
            let chunk = mem::replace(&mut self.buf, Vec::with_capacity(self.chunk_size));
            self.submit(chunk)?;
        }
        Ok(())
    }

    /// Flush the partial chunk, drain every pending result in FIFO order,
    /// shut the worker pool down (waiting for in-flight work, not cancelling
    /// it), and finalize the downstream sink. Idempotent once it has
    /// succeeded.
    pub fn close(&mut self) -> Result<(), StreamError> {
        if self.closed {
            return Ok(());
        }
        if self.aborted {
            return Err(StreamError::Pipeline("stream aborted"));
        }
        if !self.buf.is_empty() {
            let chunk = mem::take(&mut self.buf);
            self.submit(chunk)?;
        }
        while !self.pending.is_empty() {
            self.drain_head()?;
        }
        self.pool.shutdown();
        self.sink.finish()?;
        self.closed = true;
        tracing::debug!(
            chunks = self.counters.chunks_drained,
            bytes_raw = self.counters.bytes_raw,
            bytes_compressed = self.counters.bytes_compressed,
            "compressor closed"
        );
        Ok(())
    }

    /// Counters accumulated so far (stable after `close`).
    pub fn counters(&self) -> &StreamCounters {
        &self.counters
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    /// Hand back the downstream sink (e.g. to inspect produced parts).
    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Submit one chunk to the pool, first draining the FIFO head until the
    /// pending count is below the limit. Draining waits on the *oldest*
    /// submission, never the fastest, which is what bounds memory while
    /// preserving order.
    fn submit(&mut self, chunk: Vec<u8>) -> Result<(), StreamError> {
        while self.pending.len() >= self.pending_limit {
            self.drain_head()?;
        }

        let (done_tx, done_rx) = bounded::<ChunkOutcome>(1);
        let seq = self.next_seq;
        let job = ChunkJob { seq, data: Bytes::from(chunk), done: done_tx };
        tracing::trace!(seq, "chunk submitted");
        if let Err(e) = self.pool.submit(job) {
            self.abort();
            return Err(e);
        }
        self.next_seq += 1;
        self.pending.push_back(done_rx);
        self.counters.add_submitted();
        self.counters.note_pending(self.pending.len());
        Ok(())
    }

    /// Wait for the oldest pending compression and write its frame downstream.
    fn drain_head(&mut self) -> Result<(), StreamError> {
        let head = match self.pending.pop_front() {
            Some(rx) => rx,
            None => return Ok(()),
        };
        let outcome = match head.recv() {
            Ok(outcome) => outcome,
            Err(_) => {
                self.abort();
                return Err(StreamError::Pipeline("compression worker disconnected"));
            }
        };
        let frame = match outcome {
            Ok(frame) => frame,
            Err(e) => {
                self.abort();
                return Err(e.into());
            }
        };
        if let Err(e) = self.sink.write_all(&frame) {
            self.abort();
            return Err(e.into());
        }
        self.counters.add_drained(frame.len());
        Ok(())
    }

    /// Stop accepting input and tear the pool down, leaving partial output
    /// as-is. Dropping the pending receivers unblocks any worker mid-send;
    /// shutdown still waits for in-flight compression to finish.
    fn abort(&mut self) {
        self.aborted = true;
        self.pending.clear();
        self.pool.shutdown();
        tracing::debug!("pipeline aborted");
    }
}

impl<W: ByteSink> Write for OrderedParallelCompressor<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    /// No-op: frames are emitted as chunks fill and on `close`; flushing a
    /// partial chunk early would change the frame layout.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
