//! The gaze model interface and its enum dispatcher.

use std::fmt;

use eyegaze_core::{CameraParams, Pt2, Real, Vec3};

use crate::{
    EyeballModel, EyegazeError, FrameSize, GazeData, GazeModelConfig, LinearGazeModel,
};

/// What an `update` call did with its observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Same pixel as the previous call; nothing changed.
    Duplicate,
    /// The observation was folded into the model.
    Accepted,
    /// The camera ray missed the eye sphere; only the memo was refreshed.
    Missed,
    /// The refined center would have been implausible and was discarded.
    Rejected,
}

/// A per-session gaze estimator fed one pupil pixel per frame.
///
/// Implementations are not internally synchronized: `update` takes
/// `&mut self` and the frame loop owns the model.
pub trait GazeModel {
    /// Fold a new pupil observation into the model.
    fn update(&mut self, pixel: Pt2) -> UpdateOutcome;

    /// Gaze estimate for `pixel` with optional full ellipse axes from the
    /// detector. Never mutates the estimator.
    fn gaze_data_with_ellipse(&self, pixel: Pt2, ellipse_axes: Option<[Real; 2]>) -> GazeData;

    /// Gaze estimate for `pixel`.
    fn gaze_data(&self, pixel: Pt2) -> GazeData {
        self.gaze_data_with_ellipse(pixel, None)
    }

    /// Forget all observations.
    fn reset(&mut self);

    fn observation_count(&self) -> usize;

    /// Whether the warm-up phase is over.
    fn is_converged(&self) -> bool;

    /// Current eyeball-center estimate, for models that keep one.
    fn eye_center(&self) -> Option<Vec3>;
}

/// Concrete gaze model selected by [`GazeModelConfig`].
#[derive(Debug, Clone)]
pub enum AnyGazeModel {
    Eyeball(EyeballModel),
    Linear(LinearGazeModel),
}

impl AnyGazeModel {
    /// Build the configured model for frames of the given size.
    pub fn build(frame: FrameSize, config: &GazeModelConfig) -> Result<Self, EyegazeError> {
        Ok(match config {
            GazeModelConfig::Eyeball(cfg) => AnyGazeModel::Eyeball(EyeballModel::new(frame, cfg)?),
            GazeModelConfig::Linear(cfg) => {
                AnyGazeModel::Linear(LinearGazeModel::new(frame, cfg)?)
            }
        })
    }

    /// Configuration this model was built from.
    pub fn config(&self) -> GazeModelConfig {
        match self {
            AnyGazeModel::Eyeball(m) => GazeModelConfig::Eyeball(m.config().clone()),
            AnyGazeModel::Linear(m) => GazeModelConfig::Linear(m.config().clone()),
        }
    }

    pub fn frame(&self) -> FrameSize {
        match self {
            AnyGazeModel::Eyeball(m) => m.frame(),
            AnyGazeModel::Linear(m) => m.frame(),
        }
    }

    /// Camera parameters, for models that use a camera.
    pub fn camera_params(&self) -> Option<CameraParams> {
        match self {
            AnyGazeModel::Eyeball(m) => Some(m.camera_params()),
            AnyGazeModel::Linear(_) => None,
        }
    }
}

impl From<EyeballModel> for AnyGazeModel {
    fn from(m: EyeballModel) -> Self {
        AnyGazeModel::Eyeball(m)
    }
}

impl From<LinearGazeModel> for AnyGazeModel {
    fn from(m: LinearGazeModel) -> Self {
        AnyGazeModel::Linear(m)
    }
}

impl GazeModel for AnyGazeModel {
    fn update(&mut self, pixel: Pt2) -> UpdateOutcome {
        match self {
            AnyGazeModel::Eyeball(m) => GazeModel::update(m, pixel),
            AnyGazeModel::Linear(m) => GazeModel::update(m, pixel),
        }
    }

    fn gaze_data_with_ellipse(&self, pixel: Pt2, ellipse_axes: Option<[Real; 2]>) -> GazeData {
        match self {
            AnyGazeModel::Eyeball(m) => GazeModel::gaze_data_with_ellipse(m, pixel, ellipse_axes),
            AnyGazeModel::Linear(m) => GazeModel::gaze_data_with_ellipse(m, pixel, ellipse_axes),
        }
    }

    fn reset(&mut self) {
        match self {
            AnyGazeModel::Eyeball(m) => GazeModel::reset(m),
            AnyGazeModel::Linear(m) => GazeModel::reset(m),
        }
    }

    fn observation_count(&self) -> usize {
        match self {
            AnyGazeModel::Eyeball(m) => GazeModel::observation_count(m),
            AnyGazeModel::Linear(m) => GazeModel::observation_count(m),
        }
    }

    fn is_converged(&self) -> bool {
        match self {
            AnyGazeModel::Eyeball(m) => GazeModel::is_converged(m),
            AnyGazeModel::Linear(m) => GazeModel::is_converged(m),
        }
    }

    fn eye_center(&self) -> Option<Vec3> {
        match self {
            AnyGazeModel::Eyeball(m) => GazeModel::eye_center(m),
            AnyGazeModel::Linear(m) => GazeModel::eye_center(m),
        }
    }
}

impl fmt::Display for AnyGazeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyGazeModel::Eyeball(m) => fmt::Display::fmt(m, f),
            AnyGazeModel::Linear(m) => fmt::Display::fmt(m, f),
        }
    }
}
