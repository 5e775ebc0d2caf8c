use eyegaze_core::Real;
use thiserror::Error;

/// Configuration errors raised when building a gaze model.
///
/// These are the only conditions under which a model refuses to operate.
/// Geometric misses during tracking are handled by fallback and never
/// surface as errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EyegazeError {
    #[error("frame size must be positive, got {width}x{height}")]
    InvalidFrame { width: u32, height: u32 },
    #[error("eye radius must be positive and finite, got {0} mm")]
    InvalidEyeRadius(Real),
    #[error("focal length must be positive and finite, got {0} px")]
    InvalidFocalLength(Real),
    #[error("zoom factor must be positive and finite, got {0}")]
    InvalidZoom(Real),
    #[error("field of view must be in (0, 180) degrees, got {0}")]
    InvalidFieldOfView(Real),
    #[error("initial depth {depth_mm} mm must exceed the eye radius {radius_mm} mm")]
    InitialDepthInsideEye { depth_mm: Real, radius_mm: Real },
    #[error("smoothing factor `{name}` must be in (0, 1], got {value}")]
    InvalidSmoothing { name: &'static str, value: Real },
    #[error("ROI parameter `{name}` is out of range: {value}")]
    InvalidRoi { name: &'static str, value: Real },
}
