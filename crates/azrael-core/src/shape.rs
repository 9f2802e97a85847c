use azrael_geom::Transform;
use serde::{Deserialize, Serialize};

/// Collision shape attached to a body, in the body's local frame.
///
/// `Empty` bodies participate in the store and command stream but are
/// skipped by broadphase and the worker solver — they exist to represent
/// pure data holders (e.g. cameras) that ride along with the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// No collision geometry.
    Empty,
    /// Sphere centered at the body origin.
    Sphere {
        /// Sphere radius, in the body's local units.
        radius: f32,
    },
    /// Axis-aligned (in local space) box.
    Box {
        /// Half-extents along local X/Y/Z.
        half_extents: [f32; 3],
    },
    /// Infinite plane, used for static world geometry such as a ground plane.
    StaticPlane {
        /// Unit plane normal in local space.
        normal: [f32; 3],
        /// Signed distance of the plane from the local origin along `normal`.
        offset: f32,
    },
    /// A rigid grouping of child shapes, each placed at a local transform.
    Compound {
        /// Child shapes and their placement relative to the body origin.
        children: Vec<(Transform, Box<Shape>)>,
    },
}

impl Shape {
    /// Returns `true` for [`Shape::Empty`], which broadphase and dispatch both skip.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_shape_is_reported_empty() {
        assert!(Shape::Empty.is_empty());
        assert!(!Shape::Sphere { radius: 1.0 }.is_empty());
    }
}
