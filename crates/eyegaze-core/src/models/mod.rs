//! Camera model building blocks.
//!
//! A pixel is mapped back onto the `z = 1` image plane by an
//! [`IntrinsicsModel`] (focal length + principal point) and then normalized
//! into a unit ray.
//!
//! Parameter structs are provided for JSON serialization and for constructing
//! concrete camera models with f64 precision.

mod camera;
mod intrinsics;
mod params;

pub use camera::*;
pub use intrinsics::*;
pub use params::*;
