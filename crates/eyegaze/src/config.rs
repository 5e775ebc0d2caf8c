//! Serializable configuration for the gaze models.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use eyegaze_core::{CameraParams, IntrinsicsParams, PinholeIntrinsics, Real};
use serde::{Deserialize, Serialize};

use crate::EyegazeError;

/// Dimensions of the processed frame that reaches the pupil detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> Result<(), EyegazeError> {
        if self.width == 0 || self.height == 0 {
            return Err(EyegazeError::InvalidFrame {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Geometric center of the frame in pixels.
    pub fn center(&self) -> (Real, Real) {
        (self.width as Real / 2.0, self.height as Real / 2.0)
    }
}

/// Learning-rate schedule of the eyeball-center moving average.
///
/// The estimator blends with `warmup_alpha` until `warmup_observations`
/// observations have been folded in, then switches permanently to
/// `steady_alpha`. The defaults are empirical and can be retuned for other
/// eye geometries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingSchedule {
    pub warmup_alpha: Real,
    pub steady_alpha: Real,
    pub warmup_observations: usize,
}

impl Default for SmoothingSchedule {
    fn default() -> Self {
        Self {
            warmup_alpha: 0.15,
            steady_alpha: 0.03,
            warmup_observations: 40,
        }
    }
}

impl SmoothingSchedule {
    /// Learning rate after `observation_count` folded observations.
    pub fn alpha(&self, observation_count: usize) -> Real {
        if observation_count < self.warmup_observations {
            self.warmup_alpha
        } else {
            self.steady_alpha
        }
    }

    pub fn validate(&self) -> Result<(), EyegazeError> {
        for (name, value) in [
            ("warmup_alpha", self.warmup_alpha),
            ("steady_alpha", self.steady_alpha),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(EyegazeError::InvalidSmoothing { name, value });
            }
        }
        Ok(())
    }
}

/// Configuration of the sphere-based eyeball model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EyeballConfig {
    /// Effective focal length in pixels. Derived from `base_fov_deg` and
    /// `zoom_factor` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal_length_px: Option<Real>,
    /// Digital zoom applied before the frame reaches the detector.
    pub zoom_factor: Real,
    /// Horizontal field of view of the physical camera, before zoom.
    pub base_fov_deg: Real,
    /// Distance from the rotation center to the pupil surface.
    pub eye_radius_mm: Real,
    /// Initial eye-to-camera distance along the optical axis.
    pub init_depth_mm: Real,
    pub smoothing: SmoothingSchedule,
}

impl Default for EyeballConfig {
    fn default() -> Self {
        Self {
            focal_length_px: None,
            zoom_factor: 8.0,
            base_fov_deg: 60.0,
            eye_radius_mm: 12.0,
            init_depth_mm: 500.0,
            smoothing: SmoothingSchedule::default(),
        }
    }
}

impl EyeballConfig {
    pub fn validate(&self, frame: FrameSize) -> Result<(), EyegazeError> {
        frame.validate()?;
        if !(self.eye_radius_mm.is_finite() && self.eye_radius_mm > 0.0) {
            return Err(EyegazeError::InvalidEyeRadius(self.eye_radius_mm));
        }
        if !(self.init_depth_mm.is_finite() && self.init_depth_mm > self.eye_radius_mm) {
            return Err(EyegazeError::InitialDepthInsideEye {
                depth_mm: self.init_depth_mm,
                radius_mm: self.eye_radius_mm,
            });
        }
        match self.focal_length_px {
            Some(f) => {
                if !(f.is_finite() && f > 0.0) {
                    return Err(EyegazeError::InvalidFocalLength(f));
                }
            }
            None => {
                if !(self.zoom_factor.is_finite() && self.zoom_factor > 0.0) {
                    return Err(EyegazeError::InvalidZoom(self.zoom_factor));
                }
                let effective = self.base_fov_deg / self.zoom_factor;
                if !(self.base_fov_deg > 0.0 && self.base_fov_deg < 180.0) {
                    return Err(EyegazeError::InvalidFieldOfView(self.base_fov_deg));
                }
                if !(effective > 0.0 && effective < 180.0) {
                    return Err(EyegazeError::InvalidFieldOfView(effective));
                }
            }
        }
        self.smoothing.validate()
    }

    /// Camera parameters for the given frame.
    pub fn camera_params(&self, frame: FrameSize) -> CameraParams {
        let intrinsics = match self.focal_length_px {
            Some(f) => IntrinsicsParams::Pinhole {
                params: PinholeIntrinsics::centered(
                    frame.width as Real,
                    frame.height as Real,
                    f,
                ),
            },
            None => IntrinsicsParams::FieldOfView {
                frame_width: frame.width as Real,
                frame_height: frame.height as Real,
                base_fov_deg: self.base_fov_deg,
                zoom_factor: self.zoom_factor,
            },
        };
        CameraParams { intrinsics }
    }
}

/// Configuration of the linear ROI-offset baseline model.
///
/// The ROI is expressed as fractions of the frame size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearModelConfig {
    pub eye_radius_mm: Real,
    pub roi_left_frac: Real,
    pub roi_top_frac: Real,
    pub roi_width_frac: Real,
    pub roi_height_frac: Real,
}

impl Default for LinearModelConfig {
    fn default() -> Self {
        Self {
            eye_radius_mm: 12.0,
            roi_left_frac: 0.2,
            roi_top_frac: 0.3,
            roi_width_frac: 0.6,
            roi_height_frac: 0.5,
        }
    }
}

impl LinearModelConfig {
    pub fn validate(&self, frame: FrameSize) -> Result<(), EyegazeError> {
        frame.validate()?;
        if !(self.eye_radius_mm.is_finite() && self.eye_radius_mm > 0.0) {
            return Err(EyegazeError::InvalidEyeRadius(self.eye_radius_mm));
        }
        for (name, value) in [
            ("roi_width_frac", self.roi_width_frac),
            ("roi_height_frac", self.roi_height_frac),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(EyegazeError::InvalidRoi { name, value });
            }
        }
        for (name, value) in [
            ("roi_left_frac", self.roi_left_frac),
            ("roi_top_frac", self.roi_top_frac),
        ] {
            if !(0.0..1.0).contains(&value) {
                return Err(EyegazeError::InvalidRoi { name, value });
            }
        }
        let (w, h) = self.roi_size_px(frame);
        if w == 0 {
            return Err(EyegazeError::InvalidRoi {
                name: "roi_width_px",
                value: 0.0,
            });
        }
        if h == 0 {
            return Err(EyegazeError::InvalidRoi {
                name: "roi_height_px",
                value: 0.0,
            });
        }
        Ok(())
    }

    /// ROI size in whole pixels.
    pub fn roi_size_px(&self, frame: FrameSize) -> (u32, u32) {
        (
            (frame.width as Real * self.roi_width_frac) as u32,
            (frame.height as Real * self.roi_height_frac) as u32,
        )
    }

    /// ROI center in whole pixels.
    pub fn roi_center_px(&self, frame: FrameSize) -> (u32, u32) {
        let (w, h) = self.roi_size_px(frame);
        let left = (frame.width as Real * self.roi_left_frac) as u32;
        let top = (frame.height as Real * self.roi_top_frac) as u32;
        (left + w / 2, top + h / 2)
    }
}

/// Which gaze model a session builds, with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GazeModelConfig {
    Eyeball(EyeballConfig),
    Linear(LinearModelConfig),
}

impl Default for GazeModelConfig {
    fn default() -> Self {
        GazeModelConfig::Eyeball(EyeballConfig::default())
    }
}

impl GazeModelConfig {
    pub fn validate(&self, frame: FrameSize) -> Result<(), EyegazeError> {
        match self {
            GazeModelConfig::Eyeball(cfg) => cfg.validate(frame),
            GazeModelConfig::Linear(cfg) => cfg.validate(frame),
        }
    }
}
