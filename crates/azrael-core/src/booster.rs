use serde::{Deserialize, Serialize};

/// A directional force actuator mounted at a fixed point on a body.
///
/// Boosters are aggregated by the orchestrator's Phase C into a single
/// `{force, torque}` pair before dispatch — the worker never sees booster
/// geometry directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Booster {
    /// Mount point, in the body's local frame.
    pub position: [f32; 3],
    /// Unit thrust direction, in the body's local frame.
    pub direction: [f32; 3],
    /// Thrust magnitude. Zero is a valid, inert booster.
    pub force: f32,
}

impl Booster {
    /// Constructs a booster, normalizing `direction` to unit length.
    ///
    /// A zero-length direction collapses to the zero vector, producing an
    /// inert booster rather than a degenerate one.
    #[must_use]
    pub fn new(position: [f32; 3], direction: azrael_math::Vec3, force: f32) -> Self {
        let normalized = direction.normalize();
        Self {
            position,
            direction: normalized.to_array(),
            force,
        }
    }
}
