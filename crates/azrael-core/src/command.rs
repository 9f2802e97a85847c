use crate::{BodyId, TemplateId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sparse patch applied to an existing [`crate::Body`] by a `SetBody` command.
///
/// Every field is optional; omitted fields are left untouched. This mirrors
/// the façade's "partial fields" contract without requiring callers to
/// round-trip a full body just to change one property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyPatch {
    /// Replacement world-space position.
    pub position: Option<[f32; 3]>,
    /// Replacement orientation; renormalized on apply.
    pub orientation: Option<[f32; 4]>,
    /// Replacement linear velocity.
    pub v_lin: Option<[f32; 3]>,
    /// Replacement angular velocity.
    pub v_ang: Option<[f32; 3]>,
    /// Replacement inverse mass.
    pub inv_mass: Option<f32>,
    /// Replacement restitution coefficient.
    pub restitution: Option<f32>,
    /// Replacement friction coefficient.
    pub friction: Option<f32>,
}

/// A mutation submitted by the (out-of-scope) façade and enqueued for the
/// next tick's Phase A command intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Create a body from a named template, optionally overriding fields.
    Spawn {
        /// Template to instantiate.
        template: TemplateId,
        /// Fields to override on the freshly instantiated body.
        overrides: BodyPatch,
    },
    /// Remove a body. Tombstoned for one tick before the store drops it.
    Remove {
        /// Target body.
        body_id: BodyId,
    },
    /// Apply a sparse patch to an existing body, via CAS.
    SetBody {
        /// Target body.
        body_id: BodyId,
        /// Fields to overwrite.
        patch: BodyPatch,
    },
    /// Overwrite one booster's force magnitude, via CAS.
    SetForce {
        /// Target body.
        body_id: BodyId,
        /// Index into the body's booster list.
        booster_index: usize,
        /// New force magnitude.
        force: f32,
    },
    /// Apply an instantaneous velocity delta, via CAS.
    ApplyImpulse {
        /// Target body.
        body_id: BodyId,
        /// Linear impulse (mass-scaled by `inv_mass` on apply).
        linear: [f32; 3],
        /// Angular impulse (mass-scaled by the inverse inertia on apply).
        angular: [f32; 3],
    },
}

impl Command {
    /// The body a command targets, if any (`Spawn` has none yet).
    #[must_use]
    pub const fn target(&self) -> Option<BodyId> {
        match self {
            Self::Spawn { .. } => None,
            Self::Remove { body_id }
            | Self::SetBody { body_id, .. }
            | Self::SetForce { body_id, .. }
            | Self::ApplyImpulse { body_id, .. } => Some(*body_id),
        }
    }
}

/// Errors raised while validating or applying a [`Command`] against the
/// current body set, independent of how it is stored or queued.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The command's target body does not exist (or was already removed).
    #[error("body {0} not found")]
    NotFound(BodyId),
    /// `SetForce` referenced a booster index past the end of the body's list.
    #[error("body {body} has no booster at index {index}")]
    InvalidBoosterIndex {
        /// Target body.
        body: BodyId,
        /// Out-of-range index.
        index: usize,
    },
    /// The command's payload failed structural validation (e.g. a non-finite float).
    #[error("invalid command payload: {0}")]
    Validation(String),
}
