//! Geometric primitives used by the eyeball estimator.

mod sphere;

pub use sphere::*;
