//! stream/worker.rs
//! Fixed pool of compression workers fed over a bounded channel.

use std::thread::{self, JoinHandle};

use bytes::Bytes;
use crossbeam::channel::{bounded, Receiver, Sender};

use crate::compression::{CompressionError, Compressor};
use crate::types::StreamError;

/// Result of compressing one chunk.
pub(crate) type ChunkOutcome = Result<Vec<u8>, CompressionError>;

/// One unit of work: a chunk plus the single-use channel its result goes
/// back through. The submission side holds the receivers in FIFO order, so
/// ordering never depends on which worker finishes first.
pub(crate) struct ChunkJob {
    pub seq: u64,
    pub data: Bytes,
    pub done: Sender<ChunkOutcome>,
}

pub(crate) struct WorkerPool {
    job_tx: Option<Sender<ChunkJob>>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `count` workers, each owning its own compressor instance.
    ///
    /// The job channel is bounded to the worker count; a full queue blocks
    /// submission until a worker frees up.
    pub fn spawn(
        count: usize,
        mut make_compressor: impl FnMut() -> Result<Box<dyn Compressor + Send>, CompressionError>,
    ) -> Result<Self, StreamError> {
        let (job_tx, job_rx) = bounded::<ChunkJob>(count);

        let mut handles = Vec::with_capacity(count);
        for i in 0..count {
            let rx = job_rx.clone();
            let compressor = make_compressor()?;
            let handle = thread::Builder::new()
                .name(format!("compress-{i}"))
                .spawn(move || run_worker(rx, compressor))?;
            handles.push(handle);
        }

        tracing::debug!(workers = count, "compression pool started");
        Ok(Self { job_tx: Some(job_tx), handles })
    }

    pub fn submit(&self, job: ChunkJob) -> Result<(), StreamError> {
        let tx = self
            .job_tx
            .as_ref()
            .ok_or(StreamError::Pipeline("worker pool already shut down"))?;
        tx.send(job)
            .map_err(|_| StreamError::Pipeline("compression workers exited early"))
    }

    /// Close the job channel and wait for in-flight work to finish.
    pub fn shutdown(&mut self) {
        self.job_tx.take();
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Single worker loop: pull jobs until the channel closes.
fn run_worker(rx: Receiver<ChunkJob>, mut compressor: Box<dyn Compressor + Send>) {
    while let Ok(job) = rx.recv() {
        let mut out = Vec::new();
        let outcome = compressor.compress_chunk(&job.data, &mut out).map(|()| out);
        tracing::trace!(seq = job.seq, raw = job.data.len(), "chunk compressed");
        if job.done.send(outcome).is_err() {
            // Drain side dropped its receiver: the pipeline aborted.
            break;
        }
    }
}
