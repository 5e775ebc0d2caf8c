//! Core math and geometry primitives for `eyegaze`.
//!
//! This crate contains:
//! - linear algebra type aliases (`Real`, `Vec2`, `Vec3`, `Pt2`, ...),
//! - a pinhole camera model with serializable intrinsics,
//! - ray-sphere geometry used by the eyeball estimator ([`Sphere`]).
//!
//! Camera pipeline:
//! `dir = normalize([(u - cx) / f, (v - cy) / f, 1])`.
//!
//! Camera space is `+x` right, `+y` down and `+z` forward along the optical
//! axis. Everything visible to the camera has `z > 0`.

/// Ray-sphere geometry.
pub mod geometry;
/// Linear algebra type aliases and helpers.
pub mod math;
/// Camera models and parameter types.
pub mod models;

pub use geometry::*;
pub use math::*;
pub use models::*;
