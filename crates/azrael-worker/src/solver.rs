//! Reference stateless rigid-body solver.
//!
//! [`solve_island`] is the in-process implementation of the worker contract:
//! a pure function of its [`crate::WorkerRequest`], fixed sub-stepping
//! `dt` into at most `max_substeps` steps, applying external forces,
//! integrating motion, and resolving the narrow-phase shape pairs this
//! reference solver supports (sphere–sphere and sphere–static-plane).
//! Box and compound shapes still integrate kinematically but are not
//! checked for contacts by this reference solver.

use crate::{BodySnapshot, BodyUpdate, WorkerReply, WorkerRequest};
use azrael_core::{BodyId, ContactPair, Shape};
use azrael_math::{Quat, Vec3};
use std::collections::BTreeSet;

#[derive(Clone)]
struct WorkingBody {
    id: BodyId,
    version: u64,
    position: Vec3,
    orientation: Quat,
    v_lin: Vec3,
    v_ang: Vec3,
    inv_mass: f32,
    restitution: f32,
    linear_damping: f32,
    angular_damping: f32,
    shape: Shape,
    scale: f32,
}

impl From<&BodySnapshot> for WorkingBody {
    fn from(snap: &BodySnapshot) -> Self {
        Self {
            id: snap.id,
            version: snap.version,
            position: Vec3::from(snap.position),
            orientation: Quat::from(snap.orientation),
            v_lin: Vec3::from(snap.v_lin),
            v_ang: Vec3::from(snap.v_ang),
            inv_mass: snap.inv_mass,
            restitution: snap.restitution,
            linear_damping: snap.linear_damping,
            angular_damping: snap.angular_damping,
            shape: snap.shape.clone(),
            scale: snap.scale,
        }
    }
}

fn damp(v: Vec3, damping: f32, dt: f32) -> Vec3 {
    v.scale(1.0 / (1.0 + damping * dt))
}

fn integrate_orientation(q: Quat, ang_vel: Vec3, dt: f32) -> Quat {
    let [wx, wy, wz] = ang_vel.to_array();
    let omega = Quat::new(wx, wy, wz, 0.0);
    let dq = omega.multiply(&q).to_array();
    let [x, y, z, w] = q.to_array();
    Quat::new(
        x + 0.5 * dt * dq[0],
        y + 0.5 * dt * dq[1],
        z + 0.5 * dt * dq[2],
        w + 0.5 * dt * dq[3],
    )
    .normalize()
}

fn sphere_radius(body: &WorkingBody) -> Option<f32> {
    match body.shape {
        Shape::Sphere { radius } => Some(radius * body.scale),
        _ => None,
    }
}

fn plane_world(body: &WorkingBody) -> Option<(Vec3, f32)> {
    let Shape::StaticPlane { normal, offset } = body.shape else {
        return None;
    };
    let world_normal = body.orientation.to_mat4().transform_direction(&Vec3::from(normal)).normalize();
    let world_offset = offset + world_normal.dot(&body.position);
    Some((world_normal, world_offset))
}

fn resolve_sphere_sphere(a: &mut WorkingBody, b: &mut WorkingBody, ra: f32, rb: f32) -> Option<ContactPair> {
    let delta = b.position.sub(&a.position);
    let dist = delta.length();
    let combined = ra + rb;
    if dist >= combined || dist <= azrael_math::EPSILON {
        return None;
    }
    let normal = delta.scale(1.0 / dist);
    let penetration = combined - dist;

    let inv_sum = a.inv_mass + b.inv_mass;
    if inv_sum > 0.0 {
        let correction = normal.scale(penetration / inv_sum);
        a.position = a.position.sub(&correction.scale(a.inv_mass));
        b.position = b.position.add(&correction.scale(b.inv_mass));
    }

    let relative_velocity = b.v_lin.sub(&a.v_lin);
    let vel_along_normal = relative_velocity.dot(&normal);
    if vel_along_normal < 0.0 && inv_sum > 0.0 {
        let restitution = a.restitution.min(b.restitution);
        let impulse_mag = -(1.0 + restitution) * vel_along_normal / inv_sum;
        let impulse = normal.scale(impulse_mag);
        a.v_lin = a.v_lin.sub(&impulse.scale(a.inv_mass));
        b.v_lin = b.v_lin.add(&impulse.scale(b.inv_mass));
    }

    let point_on_a = a.position.add(&normal.scale(ra));
    let point_on_b = b.position.sub(&normal.scale(rb));
    Some(ContactPair::new(
        a.id,
        b.id,
        point_on_a.to_array(),
        point_on_b.to_array(),
        normal.to_array(),
    ))
}

fn resolve_sphere_plane(sphere: &mut WorkingBody, radius: f32, plane_normal: Vec3, plane_offset: f32, plane_id: BodyId) -> Option<ContactPair> {
    let signed = plane_normal.dot(&sphere.position) - plane_offset - radius;
    if signed >= 0.0 {
        return None;
    }
    sphere.position = sphere.position.add(&plane_normal.scale(-signed));

    let vel_along_normal = sphere.v_lin.dot(&plane_normal);
    if vel_along_normal < 0.0 {
        let impulse_mag = -(1.0 + sphere.restitution) * vel_along_normal;
        sphere.v_lin = sphere.v_lin.add(&plane_normal.scale(impulse_mag));
    }

    let contact_point = sphere.position.sub(&plane_normal.scale(radius));
    Some(ContactPair::new(
        sphere.id,
        plane_id,
        contact_point.to_array(),
        contact_point.to_array(),
        plane_normal.to_array(),
    ))
}

/// Advances one island by `request.dt`, returning the updated bodies and any
/// contacts detected. Bodies with `inv_mass == 0.0` or `Shape::Empty` are
/// integrated for collision purposes but never appear in the reply's
/// `bodies` list — the orchestrator treats their absence as the identity
/// update.
#[must_use]
pub fn solve_island(request: &WorkerRequest) -> WorkerReply {
    let substeps = request.max_substeps.max(1);
    let sub_dt = request.dt / substeps as f32;

    let mut bodies: Vec<WorkingBody> = request.bodies.iter().map(WorkingBody::from).collect();
    let mut contacts: Vec<ContactPair> = Vec::new();
    let mut seen_pairs: BTreeSet<(u64, u64)> = BTreeSet::new();

    for _ in 0..substeps {
        for body in &mut bodies {
            if body.inv_mass <= 0.0 {
                continue;
            }
            let external = request.external_forces.get(&body.id).copied().unwrap_or_default();
            let accel = Vec3::from(external.force).scale(body.inv_mass);
            let ang_accel = Vec3::from(external.torque).scale(body.inv_mass);
            body.v_lin = damp(body.v_lin.add(&accel.scale(sub_dt)), body.linear_damping, sub_dt);
            body.v_ang = damp(body.v_ang.add(&ang_accel.scale(sub_dt)), body.angular_damping, sub_dt);
            body.position = body.position.add(&body.v_lin.scale(sub_dt));
            body.orientation = integrate_orientation(body.orientation, body.v_ang, sub_dt);
        }

        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let (left, right) = bodies.split_at_mut(j);
                let a = &mut left[i];
                let b = &mut right[0];
                if a.inv_mass <= 0.0 && b.inv_mass <= 0.0 {
                    continue;
                }
                let contact = match (sphere_radius(a), sphere_radius(b)) {
                    (Some(ra), Some(rb)) => resolve_sphere_sphere(a, b, ra, rb),
                    (Some(ra), None) => plane_world(b).and_then(|(n, o)| resolve_sphere_plane(a, ra, n, o, b.id)),
                    (None, Some(rb)) => plane_world(a).and_then(|(n, o)| resolve_sphere_plane(b, rb, n, o, a.id)),
                    (None, None) => None,
                };
                if let Some(contact) = contact {
                    let key = (contact.a.value(), contact.b.value());
                    if seen_pairs.insert(key) {
                        contacts.push(contact);
                    }
                }
            }
        }
    }

    let updates = bodies
        .iter()
        .filter(|body| body.inv_mass > 0.0 && !body.shape.is_empty())
        .map(|body| BodyUpdate {
            id: body.id,
            version: body.version,
            position: body.position.to_array(),
            orientation: body.orientation.to_array(),
            v_lin: body.v_lin.to_array(),
            v_ang: body.v_ang.to_array(),
        })
        .collect();

    WorkerReply {
        island_id: request.island_id,
        tick_nonce: request.tick_nonce,
        bodies: updates,
        contacts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExternalForce;
    use std::collections::BTreeMap;

    fn sphere(id: u64, position: [f32; 3], v_lin: [f32; 3], inv_mass: f32) -> BodySnapshot {
        BodySnapshot {
            id: BodyId::new(id),
            version: 0,
            position,
            orientation: [0.0, 0.0, 0.0, 1.0],
            v_lin,
            v_ang: [0.0, 0.0, 0.0],
            inv_mass,
            restitution: 1.0,
            friction: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            shape: Shape::Sphere { radius: 1.0 },
            scale: 1.0,
        }
    }

    #[test]
    fn free_flight_with_no_forces_moves_in_a_straight_line() {
        let request = WorkerRequest {
            island_id: 0,
            tick_nonce: 0,
            dt: 1.0,
            max_substeps: 4,
            bodies: vec![sphere(1, [0.0, 10.0, 0.0], [1.0, 0.0, 0.0], 1.0)],
            external_forces: BTreeMap::new(),
        };
        let reply = solve_island(&request);
        assert_eq!(reply.bodies.len(), 1);
        assert!((reply.bodies[0].position[0] - 1.0).abs() < 1e-4);
        assert!(reply.contacts.is_empty());
    }

    #[test]
    fn booster_force_accelerates_the_body() {
        let mut forces = BTreeMap::new();
        forces.insert(BodyId::new(1), ExternalForce { force: [10.0, 0.0, 0.0], torque: [0.0, 0.0, 0.0] });
        let request = WorkerRequest {
            island_id: 0,
            tick_nonce: 0,
            dt: 1.0,
            max_substeps: 100,
            bodies: vec![sphere(1, [0.0, 10.0, 0.0], [0.0, 0.0, 0.0], 1.0)],
            external_forces: forces,
        };
        let reply = solve_island(&request);
        assert!(reply.bodies[0].v_lin[0] > 9.0);
    }

    #[test]
    fn static_body_is_never_moved_and_omitted_from_reply() {
        let request = WorkerRequest {
            island_id: 0,
            tick_nonce: 0,
            dt: 1.0,
            max_substeps: 4,
            bodies: vec![sphere(1, [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 0.0)],
            external_forces: BTreeMap::new(),
        };
        let reply = solve_island(&request);
        assert!(reply.bodies.is_empty());
    }

    #[test]
    fn two_spheres_bounce_apart_on_elastic_collision() {
        let request = WorkerRequest {
            island_id: 0,
            tick_nonce: 0,
            dt: 0.1,
            max_substeps: 1,
            bodies: vec![
                sphere(1, [-0.5, 0.0, 0.0], [1.0, 0.0, 0.0], 1.0),
                sphere(2, [0.5, 0.0, 0.0], [-1.0, 0.0, 0.0], 1.0),
            ],
            external_forces: BTreeMap::new(),
        };
        let reply = solve_island(&request);
        assert_eq!(reply.contacts.len(), 1);
        let a = reply.bodies.iter().find(|b| b.id == BodyId::new(1)).expect("body 1");
        let b = reply.bodies.iter().find(|b| b.id == BodyId::new(2)).expect("body 2");
        assert!(a.v_lin[0] < 0.0, "body 1 should bounce back: {a:?}");
        assert!(b.v_lin[0] > 0.0, "body 2 should bounce back: {b:?}");
    }

    #[test]
    fn sphere_rests_on_static_plane_without_sinking_through() {
        let mut plane = sphere(2, [0.0, 0.0, 0.0], [0.0, 0.0, 0.0], 0.0);
        plane.shape = Shape::StaticPlane { normal: [0.0, 1.0, 0.0], offset: 0.0 };
        let request = WorkerRequest {
            island_id: 0,
            tick_nonce: 0,
            dt: 0.1,
            max_substeps: 4,
            bodies: vec![sphere(1, [0.0, 0.5, 0.0], [0.0, -5.0, 0.0], 1.0), plane],
            external_forces: BTreeMap::new(),
        };
        let reply = solve_island(&request);
        let body = reply.bodies.iter().find(|b| b.id == BodyId::new(1)).expect("body 1");
        assert!(body.position[1] >= 1.0 - 1e-3, "sphere should be pushed back above the plane: {body:?}");
    }
}
