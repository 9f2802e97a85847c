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
#![doc = r"Geometry primitives for the Azrael tick orchestrator.

This crate provides:
- Axis-aligned bounding boxes (`Aabb`).
- Rigid transforms (`Transform`).
- A broad-phase trait and an AABB-based reference implementation.
- Union-find partitioning of overlap pairs into collision islands.

Design notes:
- Deterministic: no ambient RNG; ordering of pair and island outputs is canonical.
- Float32 throughout; operations favor clarity and reproducibility.
"]

/// Foundational geometric types.
pub mod types;
/// Broad-phase interfaces and a simple AABB-based implementation.
pub mod broad;
/// Connected-component partitioning of overlap pairs into islands.
pub mod islands;

pub use types::aabb::Aabb;
pub use types::transform::Transform;
pub use islands::partition_islands;
