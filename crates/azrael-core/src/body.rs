use crate::{Booster, Shape};
use azrael_math::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Stable identifier for a [`Body`], assigned by the state store on spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u64);

impl BodyId {
    /// Wraps a raw id value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for BodyId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

/// A rigid body: pose, velocity, mass parameters, collision shape, and
/// actuators, plus the bookkeeping the store and orchestrator attach.
///
/// See the crate-level invariants: `orientation` stays a unit quaternion up
/// to [`azrael_math::EPSILON`]-scale drift after every commit, `version`
/// strictly increases, and a body with `inv_mass == 0.0` is never moved by
/// the solver — only by a direct command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// World-space position.
    pub position: Vec3Data,
    /// Unit orientation quaternion.
    pub orientation: QuatData,
    /// Linear velocity, world space.
    pub v_lin: Vec3Data,
    /// Angular velocity, world space.
    pub v_ang: Vec3Data,
    /// Inverse mass. Zero means infinite mass (static/kinematic).
    pub inv_mass: f32,
    /// Coefficient of restitution, clamped to `[0, 1]` by the solver.
    pub restitution: f32,
    /// Coulomb friction coefficient.
    pub friction: f32,
    /// Linear velocity damping per tick, in `[0, 1]`.
    pub linear_damping: f32,
    /// Angular velocity damping per tick, in `[0, 1]`.
    pub angular_damping: f32,
    /// Collision geometry in the body's local frame.
    pub shape: Shape,
    /// Uniform scale applied to `shape`'s local dimensions.
    pub scale: f32,
    /// Mounted thrust actuators, in arrival order.
    pub boosters: Vec<Booster>,
    /// Monotonically increasing write counter; the CAS token for commits.
    pub version: u64,
    /// Last-known world-space AABB, recomputed on pose or shape change.
    pub aabb: Option<AabbData>,
    /// Whether Phase G has put this body to sleep.
    pub sleeping: bool,
    /// Consecutive below-threshold ticks observed by Phase G.
    pub sleep_ticks: u32,
}

/// Plain-data mirror of [`azrael_math::Vec3`] for serialization at the store boundary.
pub type Vec3Data = [f32; 3];
/// Plain-data mirror of [`azrael_math::Quat`] for serialization at the store boundary.
pub type QuatData = [f32; 4];

/// Plain-data world-space AABB, mirroring [`azrael_geom::Aabb`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AabbData {
    /// Minimum corner.
    pub min: Vec3Data,
    /// Maximum corner.
    pub max: Vec3Data,
}

impl Body {
    /// Returns the body's position as an [`azrael_math::Vec3`].
    #[must_use]
    pub fn position_vec(&self) -> Vec3 {
        Vec3::from(self.position)
    }

    /// Returns the body's orientation as an [`azrael_math::Quat`].
    #[must_use]
    pub fn orientation_quat(&self) -> Quat {
        Quat::from(self.orientation)
    }

    /// A body the solver never moves directly: infinite mass, or empty shape.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.inv_mass == 0.0
    }

    /// `true` once both linear and angular speed have stayed under their
    /// thresholds for `consecutive_ticks`; used by Phase G to decide whether
    /// to flip `sleeping` this tick.
    #[must_use]
    pub fn is_at_rest(&self, linear_eps: f32, angular_eps: f32) -> bool {
        let v_lin = Vec3::from(self.v_lin).length();
        let v_ang = Vec3::from(self.v_ang).length();
        v_lin < linear_eps && v_ang < angular_eps
    }

    /// Renormalizes `orientation` in place if drift from unit length exceeds `eps`.
    pub fn renormalize_orientation(&mut self, eps: f32) {
        let q = self.orientation_quat();
        let norm_sq = q.to_array().iter().map(|c| c * c).sum::<f32>();
        if (norm_sq.sqrt() - 1.0).abs() > eps {
            self.orientation = q.normalize().to_array();
        }
    }
}
