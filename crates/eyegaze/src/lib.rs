//! Online 3-D eyeball model and gaze estimation from pupil pixels.
//!
//! The pupil detector supplies one pupil-center pixel per frame. This crate
//! turns it into a 3-D gaze vector and horizontal/vertical gaze angles:
//!
//! 1. back-project the pixel through a pinhole camera to a ray,
//! 2. intersect the ray with an eye sphere of fixed radius,
//! 3. refine the sphere center with an adaptive moving average,
//! 4. take the gaze as the direction from the center through the pupil.
//!
//! ```
//! use eyegaze::{FrameSize, GazeModelConfig, GazeSession};
//! use eyegaze_core::Pt2;
//!
//! let mut session = GazeSession::new(GazeModelConfig::default());
//! let frame = FrameSize::new(640, 480);
//!
//! let gaze = session.observe(frame, Some(Pt2::new(320.0, 240.0))).unwrap().unwrap();
//! assert!(gaze.single_angles.horizontal.abs() < 1e-9);
//!
//! // A frame without a pupil produces no output and leaves the model alone.
//! assert!(session.observe(frame, None).unwrap().is_none());
//! ```
//!
//! Models are plain owned values mutated through `&mut self`; they do no
//! locking of their own.

mod config;
mod error;
mod eyeball;
mod gaze;
mod linear;
mod model;
pub mod replay;
mod session;

pub use config::{EyeballConfig, FrameSize, GazeModelConfig, LinearModelConfig, SmoothingSchedule};
pub use error::EyegazeError;
pub use eyeball::EyeballModel;
pub use gaze::{ellipse_tilt_deg, toward_camera, GazeAngles, GazeData};
pub use linear::LinearGazeModel;
pub use model::{AnyGazeModel, GazeModel, UpdateOutcome};
pub use replay::{replay_trace, PupilSample, PupilTrace, ReplayReport};
pub use session::{GazeSession, SessionState};

pub use eyegaze_core::{Pt2, Real, Vec2, Vec3};
