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
#![doc = r"The Azrael tick orchestrator.

Wires the [`azrael_store::StateStore`], [`azrael_queue`] command pipe,
[`azrael_forcegrid::ForceGrid`], and [`azrael_worker::WorkerPool`] together
into the single-threaded tick loop described by the component crates: drain
commands, load the world, accumulate forces, partition islands, dispatch to
workers under a deadline, merge replies back via CAS, and update sleep
state — phases A through G, in that order, every tick.
"]

mod error;
mod force;
mod geometry;
mod tick;

pub use error::OrchestratorError;
pub use tick::{Orchestrator, TickReport};
