use azrael_core::{BodyId, ContactPair, Shape};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The minimal per-body state a worker needs to advance one island.
///
/// A projection of [`azrael_core::Body`] — boosters and bookkeeping fields
/// the worker never sees (sleep counters, last-known AABB) are stripped out
/// by the orchestrator's Phase C before dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    /// Body identity, echoed back unchanged in the reply.
    pub id: BodyId,
    /// Baseline version this snapshot was read at; echoed back so the
    /// orchestrator can CAS the result against the store.
    pub version: u64,
    /// World-space position.
    pub position: [f32; 3],
    /// Unit orientation quaternion.
    pub orientation: [f32; 4],
    /// Linear velocity.
    pub v_lin: [f32; 3],
    /// Angular velocity.
    pub v_ang: [f32; 3],
    /// Inverse mass; zero means the worker must not move this body.
    pub inv_mass: f32,
    /// Coefficient of restitution.
    pub restitution: f32,
    /// Coulomb friction coefficient.
    pub friction: f32,
    /// Linear velocity damping per second.
    pub linear_damping: f32,
    /// Angular velocity damping per second.
    pub angular_damping: f32,
    /// Collision geometry in local space.
    pub shape: Shape,
    /// Uniform scale applied to `shape`.
    pub scale: f32,
}

/// Aggregated non-contact force and torque applied to one body this tick,
/// already summing ambient force-grid contribution, booster thrust, and any
/// impulse-derived delta from Phase A.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalForce {
    /// Net force, world space.
    pub force: [f32; 3],
    /// Net torque, world space.
    pub torque: [f32; 3],
}

/// One island's worth of solver input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRequest {
    /// Identifies the island for reply correlation and cancellation.
    pub island_id: u64,
    /// Tick nonce; a reply whose nonce doesn't match the orchestrator's
    /// current tick is discarded as stale (late/cancelled).
    pub tick_nonce: u64,
    /// Wall-clock time to advance, in seconds.
    pub dt: f32,
    /// Upper bound on fixed sub-steps used to cover `dt`.
    pub max_substeps: u32,
    /// Bodies participating in this island, including read-only statics.
    pub bodies: Vec<BodySnapshot>,
    /// Externally aggregated force/torque per body, by id.
    pub external_forces: BTreeMap<BodyId, ExternalForce>,
}

/// One body's updated kinematic state after solving.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyUpdate {
    /// Body identity.
    pub id: BodyId,
    /// Baseline version this update was computed from (the CAS expected version).
    pub version: u64,
    /// New world-space position.
    pub position: [f32; 3],
    /// New orientation quaternion (not necessarily renormalized).
    pub orientation: [f32; 4],
    /// New linear velocity.
    pub v_lin: [f32; 3],
    /// New angular velocity.
    pub v_ang: [f32; 3],
}

/// One island's worth of solver output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerReply {
    /// Echoes [`WorkerRequest::island_id`].
    pub island_id: u64,
    /// Echoes [`WorkerRequest::tick_nonce`].
    pub tick_nonce: u64,
    /// Updated bodies; statics and `Shape::Empty` bodies are omitted (the
    /// identity update is implied for them).
    pub bodies: Vec<BodyUpdate>,
    /// Contacts detected while solving this island.
    pub contacts: Vec<ContactPair>,
}
