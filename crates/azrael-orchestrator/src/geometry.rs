//! World-space AABB computation for Phase D broadphase.

use azrael_core::{Body, Shape};
use azrael_geom::Aabb;
use azrael_math::Vec3;

/// A static plane has no finite extent; it is approximated by a large slab
/// straddling the plane so broadphase can still treat it as a proxy.
const PLANE_HALF_EXTENT: f32 = 1.0e4;

fn local_aabb(shape: &Shape, scale: f32) -> Option<Aabb> {
    match shape {
        Shape::Empty => None,
        Shape::Sphere { radius } => {
            let r = radius * scale;
            Some(Aabb::from_center_half_extents(Vec3::new(0.0, 0.0, 0.0), r, r, r))
        }
        Shape::Box { half_extents } => {
            let [hx, hy, hz] = *half_extents;
            Some(Aabb::from_center_half_extents(
                Vec3::new(0.0, 0.0, 0.0),
                hx * scale,
                hy * scale,
                hz * scale,
            ))
        }
        Shape::StaticPlane { normal, offset } => {
            let n = Vec3::from(*normal).normalize();
            let center = n.scale(*offset);
            Some(Aabb::from_center_half_extents(
                center,
                PLANE_HALF_EXTENT,
                PLANE_HALF_EXTENT,
                PLANE_HALF_EXTENT,
            ))
        }
        Shape::Compound { children } => {
            let mut bounds: Option<Aabb> = None;
            for (transform, child) in children {
                let child_local = local_aabb(child, scale)?;
                let child_world = child_local.transformed(&transform.to_mat4());
                bounds = Some(match bounds {
                    Some(existing) => existing.union(&child_world),
                    None => child_world,
                });
            }
            bounds
        }
    }
}

/// Recomputes `body`'s world-space AABB from its current pose and shape.
///
/// Returns `None` for [`Shape::Empty`] bodies, which broadphase skips
/// entirely.
#[must_use]
pub fn world_aabb(body: &Body) -> Option<Aabb> {
    let local = local_aabb(&body.shape, body.scale)?;
    let transform = azrael_geom::Transform::new(
        body.position_vec(),
        body.orientation_quat(),
        Vec3::new(1.0, 1.0, 1.0),
    );
    Some(local.transformed(&transform.to_mat4()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use azrael_core::{Body, Booster};

    fn sample_body(shape: Shape, position: [f32; 3]) -> Body {
        Body {
            position,
            orientation: [0.0, 0.0, 0.0, 1.0],
            v_lin: [0.0, 0.0, 0.0],
            v_ang: [0.0, 0.0, 0.0],
            inv_mass: 1.0,
            restitution: 0.0,
            friction: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            shape,
            scale: 1.0,
            boosters: Vec::<Booster>::new(),
            version: 0,
            aabb: None,
            sleeping: false,
            sleep_ticks: 0,
        }
    }

    #[test]
    fn sphere_aabb_is_centered_on_position() {
        let body = sample_body(Shape::Sphere { radius: 2.0 }, [1.0, 0.0, 0.0]);
        let aabb = world_aabb(&body).expect("sphere has an aabb");
        assert_eq!(aabb.min().to_array(), [-1.0, -2.0, -2.0]);
        assert_eq!(aabb.max().to_array(), [3.0, 2.0, 2.0]);
    }

    #[test]
    fn empty_shape_has_no_aabb() {
        let body = sample_body(Shape::Empty, [0.0, 0.0, 0.0]);
        assert!(world_aabb(&body).is_none());
    }
}
