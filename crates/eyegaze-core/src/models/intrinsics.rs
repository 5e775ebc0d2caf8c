use nalgebra::{RealField, Vector2};
use serde::{Deserialize, Serialize};

use crate::{Real, Vec2};

/// Intrinsics that map pixels back onto the `z = 1` image plane.
pub trait IntrinsicsModel<S: RealField + Copy> {
    fn pixel_to_normalized(&self, pixel: &Vector2<S>) -> Vector2<S>;
}

/// Pinhole intrinsics with a single focal length (square pixels, no skew).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PinholeIntrinsics<S: RealField + Copy> {
    /// Focal length in pixels.
    pub f: S,
    /// Principal point X coordinate in pixels.
    pub cx: S,
    /// Principal point Y coordinate in pixels.
    pub cy: S,
}

impl PinholeIntrinsics<Real> {
    /// Intrinsics with the principal point at the geometric center of the frame.
    pub fn centered(frame_width: Real, frame_height: Real, f: Real) -> Self {
        Self {
            f,
            cx: frame_width / 2.0,
            cy: frame_height / 2.0,
        }
    }

    /// Derive the focal length from the horizontal field of view.
    ///
    /// `zoom_factor` is a digital zoom applied before the frame reaches the
    /// detector; it narrows the effective field of view by the same factor:
    ///
    /// `f = (W / 2) / tan((fov / zoom) / 2)`
    pub fn from_fov(
        frame_width: Real,
        frame_height: Real,
        base_fov_deg: Real,
        zoom_factor: Real,
    ) -> Self {
        let effective_fov_rad = (base_fov_deg / zoom_factor).to_radians();
        let f = (frame_width / 2.0) / (effective_fov_rad / 2.0).tan();
        Self::centered(frame_width, frame_height, f)
    }

    /// Returns `true` when all values are finite and the focal length is positive.
    pub fn is_valid(&self) -> bool {
        self.f.is_finite() && self.cx.is_finite() && self.cy.is_finite() && self.f > 1e-12
    }

    /// Principal point as a vector.
    pub fn principal_point(&self) -> Vec2 {
        Vec2::new(self.cx, self.cy)
    }
}

impl<S: RealField + Copy> IntrinsicsModel<S> for PinholeIntrinsics<S> {
    fn pixel_to_normalized(&self, pixel: &Vector2<S>) -> Vector2<S> {
        Vector2::new((pixel.x - self.cx) / self.f, (pixel.y - self.cy) / self.f)
    }
}
