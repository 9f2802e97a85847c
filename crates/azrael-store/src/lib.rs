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
#![doc = r"The Azrael body state store.

A single shared mapping from [`azrael_core::BodyId`] to [`azrael_core::Body`]
plus a per-body monotonic version. Readers get a point-in-time snapshot per
call; writers go through optimistic [`StateStore::commit_batch`], which only
applies a write when the caller's `expected_versions` entry matches the
currently stored version — the same single-writer-wins discipline
`rmg-core`'s transaction/snapshot pair uses, specialized to a flat body map
instead of a graph.
"]

mod memory;
mod persistence;

pub use memory::InMemoryStore;
pub use persistence::SnapshotPersistence;

use azrael_core::{Body, BodyId};
use std::collections::BTreeMap;

/// Outcome of a [`StateStore::commit_batch`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitOutcome {
    /// Ids whose write applied; their version is now `expected + 1`.
    pub committed: Vec<BodyId>,
    /// Ids whose write was rejected because the expected version was stale.
    pub conflicted: Vec<BodyId>,
}

/// The shared mapping of body id to body record.
///
/// Implementations must guarantee: single-writer-wins under CAS, and that a
/// reader's snapshot from one `get`/`get_all` call never tears mid-body
/// (each returned `Body` reflects exactly one committed version).
pub trait StateStore: Send + Sync {
    /// Returns the subset of `ids` currently present, each at its latest
    /// committed version. Missing ids are silently omitted.
    fn get(&self, ids: &[BodyId]) -> BTreeMap<BodyId, Body>;

    /// Returns every body currently present.
    fn get_all(&self) -> BTreeMap<BodyId, Body>;

    /// Inserts a new body unconditionally, assigning it a fresh [`BodyId`].
    fn add(&self, body: Body) -> BodyId;

    /// Removes bodies unconditionally. Absent ids are ignored.
    fn remove(&self, ids: &[BodyId]);

    /// Applies `writes` whose `expected_versions` entry matches the body's
    /// current stored version; on success the new version is `expected + 1`.
    /// Ids present in `writes` but missing from `expected_versions` (or vice
    /// versa) are treated as conflicted, never applied.
    fn commit_batch(
        &self,
        writes: BTreeMap<BodyId, Body>,
        expected_versions: &BTreeMap<BodyId, u64>,
    ) -> CommitOutcome;

    /// Subscribes to `(id, new_version)` notifications for every committed
    /// write, `add`, or `remove`. Used by the (out-of-scope) façade change
    /// feed; the orchestrator itself never needs to subscribe to its own store.
    fn subscribe(&self) -> tokio::sync::broadcast::Receiver<(BodyId, u64)>;
}
