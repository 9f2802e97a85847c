#![deny(
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    rust_2018_idioms,
    missing_docs,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
#![doc = r"Bounded command queue feeding the orchestrator's Phase A intake.

Producers (the out-of-scope façade) enqueue a [`azrael_core::Command`]
bundled with a reply channel; the orchestrator is the sole consumer and
drains the queue non-blocking at the start of every tick. A full queue
fails the producer's call synchronously with [`QueueError::Backpressure`]
rather than blocking — callers decide whether to retry.
"]

use azrael_core::{Command, CommandError};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

/// Result reported back to a command's submitter once Phase A has processed it.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// The command applied; for `Spawn` this carries the new body id.
    Applied {
        /// Body id created by a `Spawn`, if applicable.
        spawned: Option<azrael_core::BodyId>,
    },
    /// The command was rejected outright (not found, bad booster index, etc).
    Rejected(CommandError),
    /// The command's CAS write lost the race after retries were exhausted.
    Conflict,
    /// The orchestrator shut down before this command reached Phase A.
    Shutdown,
}

/// A command paired with the channel its submitter will be answered on.
pub struct QueuedCommand {
    /// The command to apply.
    pub command: Command,
    /// Answered exactly once by Phase A, whichever way the command resolves.
    pub reply: oneshot::Sender<CommandOutcome>,
}

/// Errors raised by [`CommandProducer::enqueue`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// The queue is at capacity; the caller may retry later.
    #[error("command queue is full")]
    Backpressure,
}

/// Producer handle; cloneable, used by every façade connection.
#[derive(Clone)]
pub struct CommandProducer {
    sender: mpsc::Sender<QueuedCommand>,
}

impl CommandProducer {
    /// Submits `command`, returning a receiver for its eventual outcome.
    ///
    /// # Errors
    /// Returns [`QueueError::Backpressure`] if the queue is at capacity;
    /// the command is not enqueued in that case.
    pub fn enqueue(&self, command: Command) -> Result<oneshot::Receiver<CommandOutcome>, QueueError> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .try_send(QueuedCommand { command, reply })
            .map_err(|_err| {
                warn!("command queue at capacity");
                QueueError::Backpressure
            })?;
        Ok(rx)
    }
}

/// Consumer handle; only the orchestrator holds one.
pub struct CommandConsumer {
    receiver: mpsc::Receiver<QueuedCommand>,
}

impl CommandConsumer {
    /// Drains every command currently queued without waiting for more.
    ///
    /// This is Phase A's entry point: it never blocks past what is already
    /// buffered, so a tick's command intake has bounded latency regardless
    /// of producer activity.
    pub fn drain(&mut self) -> Vec<QueuedCommand> {
        let mut drained = Vec::new();
        while let Ok(queued) = self.receiver.try_recv() {
            drained.push(queued);
        }
        drained
    }
}

/// Creates a bounded command queue with the given capacity.
#[must_use]
pub fn bounded(capacity: usize) -> (CommandProducer, CommandConsumer) {
    let (sender, receiver) = mpsc::channel(capacity);
    (CommandProducer { sender }, CommandConsumer { receiver })
}
