//! Core geometry types used by the orchestrator (transform, AABB).

#[doc = "Axis-aligned bounding boxes (world space)."]
pub mod aabb;
#[doc = "Rigid transforms with non-uniform scale."]
pub mod transform;
