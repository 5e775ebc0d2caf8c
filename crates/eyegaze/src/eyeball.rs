//! Sphere-based eyeball model with an online rotation-center estimate.
//!
//! Each pupil pixel is back-projected through a pinhole camera to a ray, the
//! ray is intersected with an eye sphere of fixed radius around the current
//! center estimate, and the center is nudged by an exponential moving average
//! so that the observed pupil stays on the sphere. The gaze vector runs from
//! the center through the pupil.
//!
//! Camera space is `+x` right, `+y` down, `+z` forward. The eye sits in front
//! of the camera, so the center always keeps `z > eye_radius_mm`; the camera
//! therefore never ends up inside the eye sphere.

use std::fmt;

use eyegaze_core::{try_normalize, CameraModel, CameraParams, Pt2, Real, Sphere, Vec2, Vec3};
use log::{debug, trace, warn};

use crate::{
    EyeballConfig, EyegazeError, FrameSize, GazeData, GazeModel, UpdateOutcome,
};

const MIN_OFFSET_MM: Real = 1e-9;

/// Running eyeball-center estimator and gaze-vector calculator.
///
/// One instance lives for one tracking session. Call [`update`](Self::update)
/// once per frame with the detected pupil pixel, then
/// [`gaze_data`](Self::gaze_data) as often as needed.
#[derive(Debug, Clone)]
pub struct EyeballModel {
    config: EyeballConfig,
    frame: FrameSize,
    camera: CameraModel,
    center: Vec3,
    observation_count: usize,
    last_pixel: Option<Pt2>,
    last_pupil_3d: Option<Vec3>,
}

impl EyeballModel {
    /// Build a model for frames of the given size.
    ///
    /// # Errors
    ///
    /// Returns an error for non-positive frame sizes, radius, focal length or
    /// zoom, a field of view outside `(0, 180)` degrees, an initial depth that
    /// would put the camera inside the eye, or smoothing factors outside
    /// `(0, 1]`.
    pub fn new(frame: FrameSize, config: &EyeballConfig) -> Result<Self, EyegazeError> {
        config.validate(frame)?;
        let camera = config.camera_params(frame).build();
        if !camera.k.is_valid() {
            return Err(EyegazeError::InvalidFocalLength(camera.k.f));
        }
        Ok(Self {
            config: config.clone(),
            frame,
            camera,
            center: initial_center(config),
            observation_count: 0,
            last_pixel: None,
            last_pupil_3d: None,
        })
    }

    /// Build a model with [`EyeballConfig::default`].
    pub fn with_defaults(frame: FrameSize) -> Result<Self, EyegazeError> {
        Self::new(frame, &EyeballConfig::default())
    }

    pub fn config(&self) -> &EyeballConfig {
        &self.config
    }

    pub fn frame(&self) -> FrameSize {
        self.frame
    }

    /// Camera parameters actually in use (the focal length is resolved).
    pub fn camera_params(&self) -> CameraParams {
        CameraParams::pinhole(self.camera.k)
    }

    /// Effective focal length in pixels.
    pub fn focal_length(&self) -> Real {
        self.camera.k.f
    }

    pub fn principal_point(&self) -> Pt2 {
        Pt2::from(self.camera.k.principal_point())
    }

    pub fn eye_radius(&self) -> Real {
        self.config.eye_radius_mm
    }

    /// Current rotation-center estimate in camera space (mm).
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Number of observations folded into the center estimate.
    pub fn observation_count(&self) -> usize {
        self.observation_count
    }

    pub fn last_pixel(&self) -> Option<Pt2> {
        self.last_pixel
    }

    /// Pupil position computed for the last distinct pixel.
    pub fn last_pupil_3d(&self) -> Option<Vec3> {
        self.last_pupil_3d
    }

    /// Learning rate the next accepted observation will be blended with.
    pub fn learning_rate(&self) -> Real {
        self.config.smoothing.alpha(self.observation_count)
    }

    pub fn is_converged(&self) -> bool {
        self.observation_count >= self.config.smoothing.warmup_observations
    }

    /// Eye sphere around the current center estimate.
    pub fn sphere(&self) -> Sphere<Real> {
        Sphere::new(self.center, self.config.eye_radius_mm)
    }

    /// Unit camera ray through `pixel`.
    pub fn cast_ray(&self, pixel: Pt2) -> Vec3 {
        self.camera.backproject_pixel(&pixel.coords).dir
    }

    /// Front-surface intersection of `dir` with the current eye sphere.
    pub fn intersect_sphere(&self, dir: &Vec3) -> Option<Vec3> {
        self.sphere().intersect_point(dir)
    }

    /// Pupil position for `pixel` and whether the ray actually hit the sphere.
    ///
    /// On a miss the sphere point closest to the ray is used, so the result
    /// always lies exactly one radius from the center.
    fn locate_pupil(&self, pixel: Pt2) -> (Vec3, bool) {
        let dir = self.cast_ray(pixel);
        let sphere = self.sphere();
        match sphere.intersect_point(&dir) {
            Some(p) => (p, true),
            None => (sphere.closest_surface_point(&dir), false),
        }
    }

    /// Fold a pupil observation into the center estimate.
    ///
    /// Repeating the previous pixel is a no-op, so querying the same frame
    /// twice cannot double-count it. A ray that misses the sphere leaves the
    /// center untouched but still refreshes the memoized pupil position.
    pub fn update(&mut self, pixel: Pt2) -> UpdateOutcome {
        if self.last_pixel == Some(pixel) {
            return UpdateOutcome::Duplicate;
        }

        let (pupil, on_sphere) = self.locate_pupil(pixel);
        self.last_pixel = Some(pixel);
        self.last_pupil_3d = Some(pupil);

        if !on_sphere {
            debug!(
                "ray through ({:.1}, {:.1}) missed the eye sphere; center kept at {:?}",
                pixel.x, pixel.y, self.center
            );
            return UpdateOutcome::Missed;
        }

        // Re-anchor the sphere on the new pupil along the previous center direction.
        let Some(toward_center) = try_normalize(&(self.center - pupil), MIN_OFFSET_MM) else {
            return UpdateOutcome::Rejected;
        };
        let candidate = pupil + toward_center * self.config.eye_radius_mm;

        if self.blend_center(candidate) {
            UpdateOutcome::Accepted
        } else {
            UpdateOutcome::Rejected
        }
    }

    /// Move the center toward `candidate` with the scheduled learning rate.
    ///
    /// Returns `false` and keeps the current center when the result would not
    /// lie in front of the camera by more than one eye radius.
    fn blend_center(&mut self, candidate: Vec3) -> bool {
        let alpha = self.learning_rate();
        let next = self.center * (1.0 - alpha) + candidate * alpha;
        if !(next.z > self.config.eye_radius_mm) {
            warn!(
                "rejected eyeball center update to {:?} (depth must exceed {} mm)",
                next, self.config.eye_radius_mm
            );
            return false;
        }
        trace!(
            "center {:?} -> {:?} (alpha={alpha}, n={})",
            self.center,
            next,
            self.observation_count
        );
        self.center = next;
        self.observation_count += 1;
        true
    }

    /// Pixel displacement from the principal point, scaled by the half-frame
    /// extent so the frame edges map to ±1.
    pub fn pixel_offset(&self, pixel: Pt2) -> Vec2 {
        let k = &self.camera.k;
        Vec2::new((pixel.x - k.cx) / k.cx, (pixel.y - k.cy) / k.cy)
    }

    /// Gaze estimate for `pixel` against the current center.
    ///
    /// Does not touch the estimator, so it is safe to call any number of times
    /// per frame.
    pub fn gaze_data(&self, pixel: Pt2) -> GazeData {
        self.gaze_data_with_ellipse(pixel, None)
    }

    /// Like [`gaze_data`](Self::gaze_data), also reporting the tilt implied by
    /// the detector's full ellipse axes.
    pub fn gaze_data_with_ellipse(&self, pixel: Pt2, ellipse_axes: Option<[Real; 2]>) -> GazeData {
        let (pupil, on_sphere) = self.locate_pupil(pixel);
        GazeData::from_pupil(pupil, self.center, self.pixel_offset(pixel), on_sphere)
            .with_ellipse_axes(ellipse_axes)
    }

    /// Restore the initial center and forget all observations.
    pub fn reset(&mut self) {
        self.center = initial_center(&self.config);
        self.observation_count = 0;
        self.last_pixel = None;
        self.last_pupil_3d = None;
    }
}

fn initial_center(config: &EyeballConfig) -> Vec3 {
    Vec3::new(0.0, 0.0, config.init_depth_mm)
}

impl GazeModel for EyeballModel {
    fn update(&mut self, pixel: Pt2) -> UpdateOutcome {
        EyeballModel::update(self, pixel)
    }

    fn gaze_data_with_ellipse(&self, pixel: Pt2, ellipse_axes: Option<[Real; 2]>) -> GazeData {
        EyeballModel::gaze_data_with_ellipse(self, pixel, ellipse_axes)
    }

    fn reset(&mut self) {
        EyeballModel::reset(self)
    }

    fn observation_count(&self) -> usize {
        self.observation_count
    }

    fn is_converged(&self) -> bool {
        EyeballModel::is_converged(self)
    }

    fn eye_center(&self) -> Option<Vec3> {
        Some(self.center)
    }
}

impl fmt::Display for EyeballModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EyeballModel(f={:.0}px, R={}mm, C=[{:.1}, {:.1}, {:.1}]mm, n={})",
            self.camera.k.f,
            self.config.eye_radius_mm,
            self.center.x,
            self.center.y,
            self.center.z,
            self.observation_count
        )
    }
}
