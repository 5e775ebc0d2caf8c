use nalgebra::{RealField, Vector3};
use serde::{Deserialize, Serialize};

/// A sphere in camera coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sphere<S: RealField + Copy> {
    /// Sphere center.
    pub center: Vector3<S>,
    /// Sphere radius (same units as `center`).
    pub radius: S,
}

impl<S: RealField + Copy> Sphere<S> {
    pub fn new(center: Vector3<S>, radius: S) -> Self {
        Self { center, radius }
    }

    /// Depth of the nearest intersection of a camera ray with the sphere.
    ///
    /// The ray starts at the camera origin with unit direction `dir`. With
    /// `P = t·dir` on the sphere:
    ///
    /// `t² − 2t(dir·C) + |C|² − R² = 0`
    ///
    /// Returns the smaller positive root, i.e. the front surface facing the
    /// camera. `None` when the ray misses or the sphere lies behind the camera.
    pub fn intersect_near(&self, dir: &Vector3<S>) -> Option<S> {
        let dc = dir.dot(&self.center);
        let disc = dc * dc - self.center.norm_squared() + self.radius * self.radius;
        if disc < S::zero() {
            return None;
        }
        let root = disc.sqrt();
        let near = dc - root;
        if near > S::zero() {
            return Some(near);
        }
        let far = dc + root;
        if far > S::zero() {
            Some(far)
        } else {
            None
        }
    }

    /// Point where the ray `t·dir` meets the sphere front surface.
    pub fn intersect_point(&self, dir: &Vector3<S>) -> Option<Vector3<S>> {
        self.intersect_near(dir).map(|t| dir * t)
    }

    /// Sphere point closest to the ray `t·dir`, `t >= 0`.
    ///
    /// The closest ray point to the center is `q = max(dir·C, 0)·dir`; the
    /// result is `C + R·normalize(q − C)`, which always lies on the sphere.
    /// When the ray passes through the center the front point along `−dir` is
    /// returned.
    pub fn closest_surface_point(&self, dir: &Vector3<S>) -> Vector3<S> {
        let along = dir.dot(&self.center).max(S::zero());
        let q = dir * along;
        let offset = q - self.center;
        let len = offset.norm();
        if len > S::default_epsilon() {
            self.center + offset * (self.radius / len)
        } else {
            self.center - dir * self.radius
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eye() -> Sphere<f64> {
        Sphere::new(Vector3::new(0.0, 0.0, 500.0), 12.0)
    }

    #[test]
    fn axis_ray_hits_front_surface() {
        let t = eye().intersect_near(&Vector3::new(0.0, 0.0, 1.0)).unwrap();
        assert!((t - 488.0).abs() < 1e-9, "t={t}");
    }

    #[test]
    fn off_axis_ray_misses() {
        let dir = Vector3::new(0.2, 0.0, 1.0).normalize();
        assert!(eye().intersect_near(&dir).is_none());
    }

    #[test]
    fn sphere_behind_camera_is_not_hit() {
        let s = Sphere::new(Vector3::new(0.0, 0.0, -500.0), 12.0);
        assert!(s.intersect_near(&Vector3::new(0.0, 0.0, 1.0)).is_none());
    }

    #[test]
    fn camera_inside_sphere_uses_far_root() {
        let s: Sphere<f64> = Sphere::new(Vector3::new(0.0, 0.0, 1.0), 12.0);
        let t = s.intersect_near(&Vector3::new(0.0, 0.0, 1.0)).unwrap();
        assert!((t - 13.0).abs() < 1e-9, "t={t}");
    }

    #[test]
    fn closest_surface_point_lies_on_sphere() {
        let s = eye();
        let dir = Vector3::new(0.3, -0.1, 1.0).normalize();
        assert!(s.intersect_near(&dir).is_none());
        let p = s.closest_surface_point(&dir);
        assert!(((p - s.center).norm() - s.radius).abs() < 1e-9);
        // Offset toward the ray side of the sphere.
        assert!(p.x > 0.0 && p.y < 0.0);
    }

    #[test]
    fn closest_surface_point_on_center_ray_faces_camera() {
        let s = eye();
        let p = s.closest_surface_point(&Vector3::new(0.0, 0.0, 1.0));
        assert!((p - Vector3::new(0.0, 0.0, 488.0)).norm() < 1e-9);
    }
}
