use nalgebra::{RealField, Vector2, Vector3};

use super::IntrinsicsModel;

/// A ray from the camera center with a unit direction.
#[derive(Clone, Copy, Debug)]
pub struct Ray<S: RealField + Copy> {
    pub dir: Vector3<S>,
}

/// Pinhole camera: intrinsics on top of the `(x, y, 1)` image plane.
#[derive(Clone, Debug)]
pub struct Camera<S, K>
where
    S: RealField + Copy,
    K: IntrinsicsModel<S>,
{
    pub k: K,
    _phantom: core::marker::PhantomData<S>,
}

impl<S, K> Camera<S, K>
where
    S: RealField + Copy,
    K: IntrinsicsModel<S>,
{
    pub fn new(k: K) -> Self {
        Self {
            k,
            _phantom: core::marker::PhantomData,
        }
    }

    /// Back-project a pixel to a unit ray from the camera center.
    ///
    /// The unnormalized direction is `(n.x, n.y, 1)`, so it never degenerates
    /// for finite input and always points forward.
    pub fn backproject_pixel(&self, px: &Vector2<S>) -> Ray<S> {
        let n = self.k.pixel_to_normalized(px);
        let dir = Vector3::new(n.x, n.y, S::one());
        Ray {
            dir: dir / dir.norm(),
        }
    }
}
