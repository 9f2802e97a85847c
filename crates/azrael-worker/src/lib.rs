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
#![doc = r"The Azrael worker-pool contract: request/reply island solving.

Workers are stateless: a [`WorkerPool::submit`] call is a pure function of
its [`WorkerRequest`], with no memory of prior requests. This crate ships
the request/reply types, a reference [`solver`] that implements the
contract in-process, a round-robin [`pool::InProcessPool`] dispatcher, and
[`wire`] framing so the same contract can later be spoken by an
out-of-process worker.
"]

mod error;
mod pool;
pub mod solver;
mod types;
pub mod wire;

pub use error::WorkerError;
pub use pool::{InProcessPool, WorkerPool};
pub use types::{BodySnapshot, BodyUpdate, ExternalForce, WorkerRequest, WorkerReply};
