//! types.rs
//! Unified stream error covering I/O, configuration, discovery, and codec
//! failures. `From` impls enable `?` across the pipeline.

use std::io;

use thiserror::Error;

use crate::compression::CompressionError;

#[derive(Debug, Error)]
pub enum StreamError {
    /// I/O error while creating, writing, or reading a part.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid configuration, rejected at construction.
    #[error("configuration error: {0}")]
    Config(String),

    /// No parts matched the restore pattern.
    #[error("no parts found for pattern `{0}`")]
    Discovery(String),

    /// Compression/decompression error.
    #[error("compression error: {0}")]
    Compression(#[from] CompressionError),

    /// Pipeline wiring failure (channel closed, worker gone, use after abort).
    #[error("pipeline error: {0}")]
    Pipeline(&'static str),
}
