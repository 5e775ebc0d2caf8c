//! Linear ROI-offset gaze model.
//!
//! The mapping used before the sphere model: the pupil offset from a fixed
//! region-of-interest center is scaled linearly onto an eye sphere of fixed
//! radius centered at the origin. It ignores perspective and keeps no center
//! estimate. Kept as a baseline for comparing against [`EyeballModel`].
//!
//! [`EyeballModel`]: crate::EyeballModel

use std::fmt;

use eyegaze_core::{Pt2, Real, Vec2, Vec3};

use crate::{EyegazeError, FrameSize, GazeData, GazeModel, LinearModelConfig, UpdateOutcome};

#[derive(Debug, Clone)]
pub struct LinearGazeModel {
    config: LinearModelConfig,
    frame: FrameSize,
    roi_center: Pt2,
    roi_size: Vec2,
    observation_count: usize,
}

impl LinearGazeModel {
    pub fn new(frame: FrameSize, config: &LinearModelConfig) -> Result<Self, EyegazeError> {
        config.validate(frame)?;
        let (cx, cy) = config.roi_center_px(frame);
        let (w, h) = config.roi_size_px(frame);
        Ok(Self {
            config: config.clone(),
            frame,
            roi_center: Pt2::new(cx as Real, cy as Real),
            roi_size: Vec2::new(w as Real, h as Real),
            observation_count: 0,
        })
    }

    pub fn config(&self) -> &LinearModelConfig {
        &self.config
    }

    pub fn frame(&self) -> FrameSize {
        self.frame
    }

    pub fn roi_center(&self) -> Pt2 {
        self.roi_center
    }

    /// Pupil offset from the ROI center in ROI widths/heights (`+y` down).
    pub fn roi_offset(&self, pixel: Pt2) -> Vec2 {
        (pixel - self.roi_center).component_div(&self.roi_size)
    }
}

impl GazeModel for LinearGazeModel {
    /// The linear model has no state to refine; observations are only counted.
    fn update(&mut self, _pixel: Pt2) -> UpdateOutcome {
        self.observation_count += 1;
        UpdateOutcome::Accepted
    }

    fn gaze_data_with_ellipse(&self, pixel: Pt2, ellipse_axes: Option<[Real; 2]>) -> GazeData {
        let r = self.config.eye_radius_mm;
        let offset = self.roi_offset(pixel);

        let x = offset.x * r;
        let y_up = -offset.y * r;
        let z = (r * r - x * x - y_up * y_up).max(0.0).sqrt();

        // The pupil faces the camera, so the gaze points along -z in camera space.
        let pupil = Vec3::new(x, -y_up, -z);
        GazeData::from_pupil(pupil, Vec3::zeros(), offset, true).with_ellipse_axes(ellipse_axes)
    }

    fn reset(&mut self) {
        self.observation_count = 0;
    }

    fn observation_count(&self) -> usize {
        self.observation_count
    }

    fn is_converged(&self) -> bool {
        self.observation_count > 0
    }

    fn eye_center(&self) -> Option<Vec3> {
        None
    }
}

impl fmt::Display for LinearGazeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LinearGazeModel(ROI center=({}, {}))",
            self.roi_center.x, self.roi_center.y
        )
    }
}
