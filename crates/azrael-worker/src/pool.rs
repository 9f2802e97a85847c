use crate::{solver, WorkerError, WorkerRequest, WorkerReply};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::warn;

/// A fixed fleet of stateless rigid-body solvers reachable by request/reply.
///
/// Implementations must be pure with respect to `request`: no cross-request
/// state may influence the reply. The in-process reference implementation
/// ([`InProcessPool`]) satisfies this trivially by calling [`solver::solve_island`]
/// directly; an out-of-process implementation would speak [`crate::wire`] over
/// a transport instead.
#[async_trait]
pub trait WorkerPool: Send + Sync {
    /// Submits one island's worth of work, applying `timeout` as the
    /// per-request deadline.
    ///
    /// # Errors
    /// Returns [`WorkerError::Timeout`] if no reply arrives before `timeout`,
    /// or [`WorkerError::Failed`] if the worker itself reports a failure.
    async fn submit(&self, request: WorkerRequest, timeout: Duration) -> Result<WorkerReply, WorkerError>;
}

/// Reference worker pool: dispatches onto a fixed-size round-robin set of
/// `tokio` tasks, each running the in-process [`solver::solve_island`].
///
/// Worker count is nominal here (a single CPU-bound `solve_island` call is
/// cheap relative to network-bound dispatch), but round-robin bookkeeping is
/// kept so swapping in an out-of-process pool later is a drop-in change.
pub struct InProcessPool {
    pool_size: usize,
    next_worker: AtomicUsize,
}

impl InProcessPool {
    /// Creates a pool that reports `pool_size` nominal workers.
    ///
    /// # Panics
    /// Panics if `pool_size` is zero.
    #[must_use]
    pub fn new(pool_size: usize) -> Self {
        assert!(pool_size > 0, "pool_size must be at least 1");
        Self {
            pool_size,
            next_worker: AtomicUsize::new(0),
        }
    }

    /// Returns the worker index the next `submit` call would be routed to,
    /// for observability only.
    #[must_use]
    pub fn peek_next_worker(&self) -> usize {
        self.next_worker.load(Ordering::Relaxed) % self.pool_size
    }
}

#[async_trait]
impl WorkerPool for InProcessPool {
    async fn submit(&self, request: WorkerRequest, timeout: Duration) -> Result<WorkerReply, WorkerError> {
        let worker_index = self.next_worker.fetch_add(1, Ordering::Relaxed) % self.pool_size;
        let island_id = request.island_id;
        let work = tokio::task::spawn_blocking(move || solver::solve_island(&request));

        match tokio::time::timeout(timeout, work).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(join_err)) => {
                warn!(island = island_id, worker = worker_index, %join_err, "worker task panicked");
                Err(WorkerError::Failed(join_err.to_string()))
            }
            Err(_elapsed) => {
                warn!(island = island_id, worker = worker_index, ?timeout, "worker timed out");
                Err(WorkerError::Timeout(timeout))
            }
        }
    }
}
