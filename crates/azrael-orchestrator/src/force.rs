//! Phase C force accumulation: ambient grid plus booster thrust.
//!
//! The worker never sees boosters or the grid directly — only the single
//! aggregated [`azrael_worker::ExternalForce`] this module produces per body.

use azrael_core::Body;
use azrael_forcegrid::ForceGrid;
use azrael_math::Vec3;
use azrael_worker::ExternalForce;

/// Sums the force-grid sample at `body`'s position with the world-space
/// force and torque contributed by every mounted booster.
#[must_use]
pub fn accumulate(body: &Body, grid: &ForceGrid) -> ExternalForce {
    let mut force = grid.sample(body.position_vec());
    let mut torque = Vec3::new(0.0, 0.0, 0.0);

    let orientation_mat = body.orientation_quat().to_mat4();
    for booster in &body.boosters {
        let world_direction = orientation_mat.transform_direction(&Vec3::from(booster.direction));
        let booster_force = world_direction.scale(booster.force);
        let world_offset = orientation_mat.transform_direction(&Vec3::from(booster.position));
        torque = torque.add(&world_offset.cross(&booster_force));
        force = force.add(&booster_force);
    }

    ExternalForce {
        force: force.to_array(),
        torque: torque.to_array(),
    }
}
