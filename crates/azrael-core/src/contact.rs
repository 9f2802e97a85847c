use crate::BodyId;
use serde::{Deserialize, Serialize};

/// A single contact point between two bodies, reported by a worker reply.
///
/// Transient: contacts are never persisted across ticks. `a` is always the
/// smaller [`BodyId`] so two workers reporting the same contact agree on
/// representation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactPair {
    /// The lower-id body in the pair.
    pub a: BodyId,
    /// The higher-id body in the pair.
    pub b: BodyId,
    /// Contact point on `a`'s surface, world space.
    pub point_on_a: [f32; 3],
    /// Contact point on `b`'s surface, world space.
    pub point_on_b: [f32; 3],
    /// Contact normal on `b`'s surface, world space, pointing from `a` to `b`.
    pub normal_on_b: [f32; 3],
}

impl ContactPair {
    /// Builds a contact pair, swapping `a`/`b` and their geometry as needed
    /// so `a < b` always holds.
    #[must_use]
    pub fn new(
        a: BodyId,
        b: BodyId,
        point_on_a: [f32; 3],
        point_on_b: [f32; 3],
        normal_on_b: [f32; 3],
    ) -> Self {
        if a.value() <= b.value() {
            Self { a, b, point_on_a, point_on_b, normal_on_b }
        } else {
            Self {
                a: b,
                b: a,
                point_on_a: point_on_b,
                point_on_b: point_on_a,
                normal_on_b: normal_on_b.map(|c| -c),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_canonicalizes_ordering() {
        let c = ContactPair::new(
            BodyId::new(5),
            BodyId::new(2),
            [1.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
        );
        assert_eq!(c.a, BodyId::new(2));
        assert_eq!(c.b, BodyId::new(5));
        assert_eq!(c.point_on_a, [2.0, 0.0, 0.0]);
        assert_eq!(c.normal_on_b, [0.0, -1.0, 0.0]);
    }
}
