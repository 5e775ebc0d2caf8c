//! Offline replay of recorded pupil traces.
//!
//! A trace is the per-frame output of the pupil detector for one session,
//! stored as JSON:
//!
//! ```json
//! {
//!   "frame_width": 640,
//!   "frame_height": 480,
//!   "samples": [
//!     { "pixel": [320.0, 240.0] },
//!     { "pixel": null },
//!     { "pixel": [331.5, 238.0], "ellipse_axes": [21.0, 18.5] }
//!   ]
//! }
//! ```

use std::{fs, path::Path};

use anyhow::{Context, Result};
use eyegaze_core::{CameraParams, Pt2, Real, Vec3};
use serde::{Deserialize, Serialize};

use crate::{FrameSize, GazeData, GazeModel, GazeModelConfig, GazeSession};

/// One frame of detector output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PupilSample {
    /// Pupil center in pixels, `None` when detection failed.
    #[serde(default)]
    pub pixel: Option<[Real; 2]>,
    /// Full ellipse axes fitted by the detector, if available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ellipse_axes: Option<[Real; 2]>,
}

/// A recorded sequence of detector outputs for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PupilTrace {
    pub frame_width: u32,
    pub frame_height: u32,
    pub samples: Vec<PupilSample>,
}

impl PupilTrace {
    pub fn frame(&self) -> FrameSize {
        FrameSize::new(self.frame_width, self.frame_height)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse pupil trace JSON")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read pupil trace {}", path.display()))?;
        Self::from_json_str(&data)
    }
}

/// Gaze output for one replayed frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameRecord {
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gaze: Option<GazeData>,
}

/// Result of replaying a trace through a fresh session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayReport {
    pub frames: Vec<FrameRecord>,
    /// Frames with a detected pupil.
    pub detections: usize,
    /// Detected frames whose ray missed the eye sphere.
    pub misses: usize,
    /// Observations folded into the model.
    pub observation_count: usize,
    pub converged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_center: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraParams>,
}

/// Run every sample of `trace` through a new session built from `config`.
///
/// # Errors
///
/// Fails when the configuration is invalid for the trace's frame size.
pub fn replay_trace(trace: &PupilTrace, config: &GazeModelConfig) -> Result<ReplayReport> {
    let frame = trace.frame();
    config
        .validate(frame)
        .context("invalid gaze model configuration")?;

    let mut session = GazeSession::new(config.clone());
    let mut frames = Vec::with_capacity(trace.samples.len());
    let mut detections = 0;
    let mut misses = 0;

    for (index, sample) in trace.samples.iter().enumerate() {
        let pixel = sample.pixel.map(|[u, v]| Pt2::new(u, v));
        let gaze = session.observe_with_ellipse(frame, pixel, sample.ellipse_axes)?;
        if let Some(g) = &gaze {
            detections += 1;
            if !g.on_sphere {
                misses += 1;
            }
        }
        frames.push(FrameRecord { index, gaze });
    }

    let model = session.model();
    Ok(ReplayReport {
        frames,
        detections,
        misses,
        observation_count: model.map_or(0, |m| m.observation_count()),
        converged: model.is_some_and(|m| m.is_converged()),
        final_center: model.and_then(|m| m.eye_center()),
        camera: model.and_then(|m| m.camera_params()),
    })
}
