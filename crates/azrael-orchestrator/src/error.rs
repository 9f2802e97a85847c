use azrael_core::{BodyId, CommandError};
use azrael_queue::QueueError;
use azrael_worker::WorkerError;
use thiserror::Error;

/// Errors surfaced at the tick-loop boundary.
///
/// Command-originated variants are replied to the submitter synchronously
/// via [`azrael_queue::CommandOutcome`]; the orchestrator itself only ever
/// sees [`Self::Fatal`] as something that should stop the tick loop. The
/// other variants exist so the (out-of-scope) façade and the orchestrator
/// share one error vocabulary, mirroring the layered `EngineError` the
/// teacher's lower-level crates converge into.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// A command's payload failed structural validation before intake.
    #[error("validation failed: {0}")]
    Validation(String),
    /// A command targeted a body that does not exist.
    #[error("body {0} not found")]
    NotFound(BodyId),
    /// A command's CAS write lost the race after all retries were exhausted.
    #[error("CAS conflict on body {0} after retries")]
    Conflict(BodyId),
    /// The command queue rejected an enqueue due to backpressure.
    #[error(transparent)]
    Backpressure(#[from] QueueError),
    /// An island's worker request timed out or the worker itself failed.
    #[error(transparent)]
    Worker(#[from] WorkerError),
    /// The state store is unavailable or an invariant was violated; the
    /// orchestrator aborts the current tick and stops the loop.
    #[error("fatal orchestrator error: {0}")]
    Fatal(String),
}

impl From<CommandError> for OrchestratorError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::NotFound(id) => Self::NotFound(id),
            CommandError::InvalidBoosterIndex { body, index } => {
                Self::Validation(format!("body {body} has no booster at index {index}"))
            }
            CommandError::Validation(msg) => Self::Validation(msg),
        }
    }
}
