//! Deterministic math helpers covering linear algebra primitives and
//! quaternions.
//!
//! # Math Overview
//! - Scalar type: all computations use `f32` to mirror runtime float32 mode.
//! - Coordinate system: right-handed; matrices are column-major.
//! - Multiplication order: `Mat4::multiply(a, b)` computes `a * b` (left * right).
//! - Transform conventions:
//!   - Points use homogeneous `w = 1` (`Mat4::transform_point`).
//!   - Directions use homogeneous `w = 0` (`Mat4::transform_direction`).
//! - Epsilon: [`EPSILON`] guards degeneracy (e.g., zero-length vectors).
//! - Determinism: operations avoid platform RNGs and non-deterministic sources.

mod mat4;
mod quat;
mod vec3;

pub use mat4::Mat4;
pub use quat::Quat;
pub use vec3::Vec3;

/// Global epsilon used by math routines when detecting degenerate values.
pub const EPSILON: f32 = 1e-6;
