//! Broad-phase interfaces and a minimal reference implementation.
//!
//! Determinism contract (applies to all implementations used here):
//! - Pair identity is canonicalized as `(min_id, max_id)`.
//! - The emitted pair list is strictly sorted lexicographically by that tuple.
//! - Overlap is inclusive on faces (touching AABBs are considered overlapping).

#[doc = "Reference AABB-based broad-phase and trait definitions."]
pub mod aabb_tree;

pub use aabb_tree::{AabbTree, BroadPhase};
