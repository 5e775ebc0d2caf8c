use serde::{Deserialize, Serialize};

use super::{Camera, PinholeIntrinsics};
use crate::Real;

/// How the focal length and principal point are specified.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IntrinsicsParams {
    /// Explicit focal length and principal point.
    Pinhole {
        #[serde(flatten)]
        params: PinholeIntrinsics<Real>,
    },
    /// Focal length derived from the field of view, principal point at the
    /// frame center.
    FieldOfView {
        frame_width: Real,
        frame_height: Real,
        base_fov_deg: Real,
        zoom_factor: Real,
    },
}

impl IntrinsicsParams {
    /// Resolve to concrete pinhole intrinsics.
    pub fn resolve(&self) -> PinholeIntrinsics<Real> {
        match *self {
            IntrinsicsParams::Pinhole { params } => params,
            IntrinsicsParams::FieldOfView {
                frame_width,
                frame_height,
                base_fov_deg,
                zoom_factor,
            } => PinholeIntrinsics::from_fov(frame_width, frame_height, base_fov_deg, zoom_factor),
        }
    }
}

/// Camera description as stored in configs and replay reports.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraParams {
    pub intrinsics: IntrinsicsParams,
}

/// Runtime camera used by the estimator.
pub type CameraModel = Camera<Real, PinholeIntrinsics<Real>>;

impl CameraParams {
    /// Pinhole camera with explicit intrinsics.
    pub fn pinhole(intrinsics: PinholeIntrinsics<Real>) -> Self {
        Self {
            intrinsics: IntrinsicsParams::Pinhole { params: intrinsics },
        }
    }

    /// Resolve the intrinsics and build the runtime camera.
    pub fn build(&self) -> CameraModel {
        Camera::new(self.intrinsics.resolve())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_params_json_shape() {
        let params = CameraParams {
            intrinsics: IntrinsicsParams::FieldOfView {
                frame_width: 640.0,
                frame_height: 480.0,
                base_fov_deg: 60.0,
                zoom_factor: 8.0,
            },
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["intrinsics"]["type"], "field_of_view");
        assert_eq!(json["intrinsics"]["zoom_factor"], 8.0);

        let back: CameraParams = serde_json::from_value(json).unwrap();
        assert_eq!(back, params);
    }

    #[test]
    fn flattened_pinhole_intrinsics() {
        let json = r#"{
            "intrinsics": { "type": "pinhole", "f": 900.0, "cx": 320.0, "cy": 240.0 }
        }"#;
        let params: CameraParams = serde_json::from_str(json).unwrap();
        let cam = params.build();
        assert_eq!(cam.k.f, 900.0);
        assert_eq!(cam.k.principal_point().x, 320.0);
    }
}
