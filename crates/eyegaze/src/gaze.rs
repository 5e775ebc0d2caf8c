//! Gaze output types shared by all gaze models.

use eyegaze_core::{angle_between, try_normalize, Real, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Optical axis pointing back at the camera: the gaze direction of an eye
/// looking straight into the lens.
pub fn toward_camera() -> Vec3 {
    Vec3::new(0.0, 0.0, -1.0)
}

/// Horizontal and vertical gaze angles in radians.
///
/// `horizontal > 0` means looking right from the camera's point of view,
/// `vertical > 0` means looking up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazeAngles {
    pub horizontal: Real,
    pub vertical: Real,
}

impl GazeAngles {
    /// Angles of a unit gaze vector in camera space (`+y` down, `+z` forward).
    pub fn from_gaze_vector(g: &Vec3) -> Self {
        Self {
            horizontal: g.x.atan2(-g.z),
            vertical: (-g.y).atan2(-g.z),
        }
    }

    /// `[horizontal, vertical]` in degrees.
    pub fn to_degrees(self) -> [Real; 2] {
        [self.horizontal.to_degrees(), self.vertical.to_degrees()]
    }
}

/// Per-observation gaze estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GazeData {
    /// Unit gaze vector from the eyeball center through the pupil.
    pub single_gaze_vector: Vec3,
    /// Gaze angles; the only field cursor mapping consumes.
    pub single_angles: GazeAngles,
    /// Normalized 2-D pupil offset kept for consumers of the older signal.
    pub single_offset: Vec2,
    /// Eyeball rotation center used for this estimate (mm).
    pub eye_center_3d: Vec3,
    /// Angle between the gaze vector and the optical axis, in degrees.
    pub tilt_deg: Real,
    /// 3-D pupil position used for this estimate (mm).
    pub pupil_3d: Vec3,
    /// `false` when the camera ray missed the eye sphere and the closest
    /// sphere point was used instead.
    pub on_sphere: bool,
    /// Tilt implied by the detector's pupil ellipse, if axes were supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ellipse_tilt_deg: Option<Real>,
}

impl GazeData {
    /// Assemble the output for a pupil at `pupil_3d` on an eye centered at `center`.
    pub fn from_pupil(pupil_3d: Vec3, center: Vec3, offset: Vec2, on_sphere: bool) -> Self {
        let g = try_normalize(&(pupil_3d - center), 1e-9).unwrap_or_else(toward_camera);
        Self::from_gaze_vector(g, pupil_3d, center, offset, on_sphere)
    }

    /// Assemble the output from an already normalized gaze vector.
    pub fn from_gaze_vector(
        g: Vec3,
        pupil_3d: Vec3,
        center: Vec3,
        offset: Vec2,
        on_sphere: bool,
    ) -> Self {
        Self {
            single_gaze_vector: g,
            single_angles: GazeAngles::from_gaze_vector(&g),
            single_offset: offset,
            eye_center_3d: center,
            tilt_deg: angle_between(&g, &toward_camera()).to_degrees(),
            pupil_3d,
            on_sphere,
            ellipse_tilt_deg: None,
        }
    }

    pub fn with_ellipse_axes(mut self, ellipse_axes: Option<[Real; 2]>) -> Self {
        self.ellipse_tilt_deg = ellipse_axes.and_then(ellipse_tilt_deg);
        self
    }
}

/// Out-of-plane tilt of a circle seen as an ellipse with the given full axes.
///
/// A circle tilted by θ projects with `minor / major = cos θ`. Returns `None`
/// when the major axis is degenerate.
pub fn ellipse_tilt_deg(axes: [Real; 2]) -> Option<Real> {
    let major = axes[0].max(axes[1]);
    let minor = axes[0].min(axes[1]);
    if !(major > 1e-3) {
        return None;
    }
    let ratio = (minor / major).min(1.0);
    Some(ratio.acos().to_degrees())
}
