//! Two-phase tracking session.
//!
//! A gaze model needs the frame dimensions before it can place the principal
//! point, and those are only known once the first frame arrives. The session
//! makes that explicit:
//!
//! ```text
//! Uninitialized --observe(frame, Some(pixel))--> Ready { frame, model }
//! ```
//!
//! Frames without a detected pupil pass through without touching the model.

use eyegaze_core::{Pt2, Real};
use log::{debug, warn};

use crate::{AnyGazeModel, EyegazeError, FrameSize, GazeData, GazeModel, GazeModelConfig};

/// Lifecycle state of a [`GazeSession`].
#[derive(Debug, Clone)]
pub enum SessionState {
    /// No pupil has been observed yet.
    Uninitialized,
    /// The model has been built for frames of the given size.
    Ready { frame: FrameSize, model: AnyGazeModel },
}

/// Owns one gaze model for the duration of a tracking session.
///
/// Not internally synchronized: all calls are expected from the frame loop.
#[derive(Debug, Clone)]
pub struct GazeSession {
    config: GazeModelConfig,
    state: SessionState,
}

impl Default for GazeSession {
    fn default() -> Self {
        Self::new(GazeModelConfig::default())
    }
}

impl GazeSession {
    /// Session that builds its model lazily on the first observation.
    pub fn new(config: GazeModelConfig) -> Self {
        Self {
            config,
            state: SessionState::Uninitialized,
        }
    }

    /// Session that is ready from the start with an existing model.
    pub fn from_model(model: AnyGazeModel) -> Self {
        Self {
            config: model.config(),
            state: SessionState::Ready {
                frame: model.frame(),
                model,
            },
        }
    }

    pub fn config(&self) -> &GazeModelConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, SessionState::Ready { .. })
    }

    pub fn model(&self) -> Option<&AnyGazeModel> {
        match &self.state {
            SessionState::Ready { model, .. } => Some(model),
            SessionState::Uninitialized => None,
        }
    }

    pub fn model_mut(&mut self) -> Option<&mut AnyGazeModel> {
        match &mut self.state {
            SessionState::Ready { model, .. } => Some(model),
            SessionState::Uninitialized => None,
        }
    }

    /// Process one frame.
    ///
    /// `pixel` is the detected pupil center, or `None` when detection failed.
    /// On the first detected pupil the model is built for `frame`. A frame of
    /// a different size starts a fresh model, since the principal point moved.
    ///
    /// # Errors
    ///
    /// Returns the configuration error when the model cannot be built.
    pub fn observe(
        &mut self,
        frame: FrameSize,
        pixel: Option<Pt2>,
    ) -> Result<Option<GazeData>, EyegazeError> {
        self.observe_with_ellipse(frame, pixel, None)
    }

    /// Like [`observe`](Self::observe), forwarding the detector's full
    /// ellipse axes for the tilt diagnostic.
    pub fn observe_with_ellipse(
        &mut self,
        frame: FrameSize,
        pixel: Option<Pt2>,
        ellipse_axes: Option<[Real; 2]>,
    ) -> Result<Option<GazeData>, EyegazeError> {
        let Some(pixel) = pixel else {
            return Ok(None);
        };

        let rebuild = match &self.state {
            SessionState::Uninitialized => {
                debug!("building gaze model for {}x{} frames", frame.width, frame.height);
                true
            }
            SessionState::Ready { frame: current, .. } if *current != frame => {
                warn!(
                    "frame size changed from {}x{} to {}x{}; restarting gaze model",
                    current.width, current.height, frame.width, frame.height
                );
                true
            }
            SessionState::Ready { .. } => false,
        };
        if rebuild {
            let model = AnyGazeModel::build(frame, &self.config)?;
            self.state = SessionState::Ready { frame, model };
        }

        match &mut self.state {
            SessionState::Ready { model, .. } => {
                model.update(pixel);
                Ok(Some(model.gaze_data_with_ellipse(pixel, ellipse_axes)))
            }
            SessionState::Uninitialized => Ok(None),
        }
    }

    /// Drop the model; the next observation builds a fresh one.
    pub fn reset(&mut self) {
        self.state = SessionState::Uninitialized;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EyeballConfig, EyeballModel, LinearModelConfig};

    const VGA: FrameSize = FrameSize {
        width: 640,
        height: 480,
    };

    #[test]
    fn starts_uninitialized_and_ignores_missing_pupils() {
        let mut s = GazeSession::default();
        assert!(!s.is_ready());
        assert_eq!(s.observe(VGA, None).unwrap(), None);
        assert!(!s.is_ready());
        assert!(s.model().is_none());
    }

    #[test]
    fn first_pupil_builds_model() {
        let mut s = GazeSession::default();
        let g = s.observe(VGA, Some(Pt2::new(320.0, 240.0))).unwrap().unwrap();
        assert!(g.on_sphere);
        assert!(s.is_ready());
        let model = s.model().unwrap();
        assert_eq!(model.observation_count(), 1);
        assert!(matches!(model, AnyGazeModel::Eyeball(_)));
    }

    #[test]
    fn missing_pupil_leaves_ready_model_untouched() {
        let mut s = GazeSession::default();
        s.observe(VGA, Some(Pt2::new(330.0, 240.0))).unwrap();
        s.observe(VGA, None).unwrap();
        assert_eq!(s.model().unwrap().observation_count(), 1);
    }

    #[test]
    fn invalid_config_surfaces_on_first_pupil() {
        let mut s = GazeSession::new(GazeModelConfig::Eyeball(EyeballConfig {
            eye_radius_mm: 0.0,
            ..EyeballConfig::default()
        }));
        // No pupil, no model, no error.
        assert!(s.observe(VGA, None).is_ok());
        let err = s.observe(VGA, Some(Pt2::new(1.0, 1.0))).unwrap_err();
        assert_eq!(err, EyegazeError::InvalidEyeRadius(0.0));
        assert!(!s.is_ready());
    }

    #[test]
    fn frame_change_rebuilds_model() {
        let mut s = GazeSession::default();
        s.observe(VGA, Some(Pt2::new(320.0, 240.0))).unwrap();
        s.observe(VGA, Some(Pt2::new(322.0, 240.0))).unwrap();
        assert_eq!(s.model().unwrap().observation_count(), 2);

        let hd = FrameSize::new(1280, 720);
        s.observe(hd, Some(Pt2::new(640.0, 360.0))).unwrap();
        let model = s.model().unwrap();
        assert_eq!(model.frame(), hd);
        assert_eq!(model.observation_count(), 1);
    }

    #[test]
    fn from_model_is_ready_immediately() {
        let m = EyeballModel::with_defaults(VGA).unwrap();
        let s = GazeSession::from_model(m.into());
        assert!(s.is_ready());
        assert_eq!(s.config(), &GazeModelConfig::default());
    }

    #[test]
    fn linear_sessions_use_linear_model() {
        let mut s = GazeSession::new(GazeModelConfig::Linear(LinearModelConfig::default()));
        let g = s.observe(VGA, Some(Pt2::new(320.0, 264.0))).unwrap().unwrap();
        assert!(g.tilt_deg.abs() < 1e-9);
        assert!(matches!(s.model(), Some(AnyGazeModel::Linear(_))));
        assert!(s.model().unwrap().eye_center().is_none());
    }

    #[test]
    fn reset_returns_to_uninitialized() {
        let mut s = GazeSession::default();
        s.observe(VGA, Some(Pt2::new(320.0, 240.0))).unwrap();
        s.reset();
        assert!(!s.is_ready());
    }
}
