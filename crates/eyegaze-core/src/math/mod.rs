//! Mathematical utilities and type definitions.
//!
//! This module provides fundamental types used throughout the workspace
//! and a few small vector helpers.

use nalgebra::{Point2, Vector2, Vector3};

/// Scalar type used throughout the library (currently `f64`).
pub type Real = f64;

/// 2D vector with [`Real`] components.
pub type Vec2 = Vector2<Real>;
/// 3D vector with [`Real`] components.
pub type Vec3 = Vector3<Real>;
/// 2D point with [`Real`] coordinates.
pub type Pt2 = Point2<Real>;

/// Normalize `v`, or return `None` when its norm is below `eps`.
pub fn try_normalize(v: &Vec3, eps: Real) -> Option<Vec3> {
    let n = v.norm();
    if n < eps {
        None
    } else {
        Some(v / n)
    }
}

/// Angle between two directions in radians, in `[0, π]`.
///
/// The cosine is clamped before `acos` so nearly parallel unit vectors do not
/// produce NaN from rounding.
pub fn angle_between(a: &Vec3, b: &Vec3) -> Real {
    let denom = a.norm() * b.norm();
    if denom <= 0.0 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos()
}
