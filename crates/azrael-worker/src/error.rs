use thiserror::Error;

/// Errors a [`crate::WorkerPool::submit`] call can surface to its caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkerError {
    /// No reply arrived before the per-request timeout.
    #[error("worker timed out after {0:?}")]
    Timeout(std::time::Duration),
    /// The worker reported a processing failure for this island.
    #[error("worker failed: {0}")]
    Failed(String),
}
