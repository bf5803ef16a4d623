//! Engine error types

use thiserror::Error;

/// Result alias for engine operations
pub type Result<T> = std::result::Result<T, MinifyError>;

/// Errors surfaced by the minification engine
#[derive(Debug, Error)]
pub enum MinifyError {
    /// The caller-supplied output buffer cannot hold the minified output.
    /// Always recoverable: resize to at least the input length and retry.
    #[error("output buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    /// A worker could not allocate the output buffer for its chunk.
    #[error("allocation failed for chunk {chunk_index}")]
    AllocationFailed { chunk_index: u32 },

    /// A worker panicked while processing a chunk. Sibling chunks still
    /// ran to completion and the pool stays usable.
    #[error("worker panicked while processing chunk {chunk_index}")]
    WorkerPanicked { chunk_index: u32 },

    /// The worker pool could not be constructed. Fatal to engine
    /// initialization, never to an in-flight call.
    #[error("failed to spawn worker thread: {0}")]
    ThreadSpawnFailed(#[from] std::io::Error),
}

impl From<blazejson_simd::BufferTooSmall> for MinifyError {
    fn from(err: blazejson_simd::BufferTooSmall) -> Self {
        MinifyError::BufferTooSmall {
            needed: err.needed,
            available: err.available,
        }
    }
}
