//! End-to-end behavior of the eyeball estimator on a 640x480 frame behind an
//! 8x digital zoom.

use eyegaze::{
    EyeballConfig, EyeballModel, FrameSize, GazeModel, Pt2, UpdateOutcome, Vec3,
};

fn vga_model() -> EyeballModel {
    let config = EyeballConfig {
        focal_length_px: None,
        zoom_factor: 8.0,
        base_fov_deg: 60.0,
        eye_radius_mm: 12.0,
        init_depth_mm: 500.0,
        ..EyeballConfig::default()
    };
    EyeballModel::new(FrameSize::new(640, 480), &config).unwrap()
}

#[test]
fn principal_point_reads_as_straight_ahead() {
    let model = vga_model();
    let gaze = model.gaze_data(Pt2::new(320.0, 240.0));

    assert!(gaze.on_sphere);
    assert!(gaze.single_angles.horizontal.abs() < 1e-12);
    assert!(gaze.single_angles.vertical.abs() < 1e-12);
    assert!(gaze.tilt_deg.abs() < 1e-9, "tilt={}", gaze.tilt_deg);
    assert!((gaze.single_gaze_vector - Vec3::new(0.0, 0.0, -1.0)).norm() < 1e-12);
    assert!((gaze.pupil_3d - Vec3::new(0.0, 0.0, 488.0)).norm() < 1e-9);
    assert_eq!(gaze.eye_center_3d, Vec3::new(0.0, 0.0, 500.0));
}

#[test]
fn pupil_stays_on_sphere() {
    let mut model = vga_model();
    for i in 0..60 {
        let px = Pt2::new(300.0 + (i % 7) as f64 * 6.0, 225.0 + (i % 5) as f64 * 7.0);
        model.update(px);
        let gaze = model.gaze_data(px);
        let r = (gaze.pupil_3d - model.center()).norm();
        assert!((r - 12.0).abs() < 1e-6, "frame {i}: |P-C|={r}");
        assert!((gaze.single_gaze_vector.norm() - 1.0).abs() < 1e-12);
    }
}

#[test]
fn double_update_counts_once() {
    let mut model = vga_model();
    let px = Pt2::new(335.0, 247.0);

    model.update(px);
    let center = model.center();
    let count = model.observation_count();
    assert_eq!(model.update(px), UpdateOutcome::Duplicate);

    assert_eq!(model.center(), center);
    assert_eq!(model.observation_count(), count);
    assert_eq!(count, 1);
}

#[test]
fn end_to_end_straight_then_right() {
    let mut model = vga_model();
    let center_px = Pt2::new(320.0, 240.0);
    for _ in 0..50 {
        model.update(center_px);
    }
    // Identical pixels fold in once.
    assert_eq!(model.observation_count(), 1);

    let gaze = model.gaze_data(center_px);
    let [h, v] = gaze.single_angles.to_degrees();
    assert!(h.abs() < 0.5, "h={h}");
    assert!(v.abs() < 0.5, "v={v}");
    assert!((model.center().z - 500.0).abs() < 3.0, "center={:?}", model.center());

    let right = Pt2::new(420.0, 240.0);
    assert_eq!(model.update(right), UpdateOutcome::Accepted);
    let gaze = model.gaze_data(right);
    assert!(gaze.on_sphere);
    assert!(gaze.single_angles.horizontal > 0.0);
    assert!(gaze.single_angles.vertical.abs() < 1e-9);
    assert!(gaze.single_offset.x > 0.0);
}

#[test]
fn vertical_sign_follows_image_up() {
    let model = vga_model();
    let up = model.gaze_data(Pt2::new(320.0, 200.0));
    let down = model.gaze_data(Pt2::new(320.0, 280.0));
    assert!(up.single_angles.vertical > 0.0);
    assert!(down.single_angles.vertical < 0.0);
    assert!((up.single_angles.vertical + down.single_angles.vertical).abs() < 1e-9);
}

#[test]
fn converged_tracking_keeps_plausible_center() {
    let mut model = vga_model();
    for i in 0..200 {
        let t = i as f64 * 0.1;
        let px = Pt2::new(320.0 + 40.0 * t.sin(), 240.0 + 25.0 * (0.7 * t).cos());
        match model.observation_count() {
            39 => {
                assert!(!model.is_converged());
                assert_eq!(model.learning_rate(), 0.15);
            }
            40 => {
                assert!(model.is_converged());
                assert_eq!(model.learning_rate(), 0.03);
            }
            _ => {}
        }
        assert_eq!(model.update(px), UpdateOutcome::Accepted);
    }
    assert!(model.is_converged());
    assert_eq!(model.observation_count(), 200);
    let c = model.center();
    assert!(c.z > 12.0);
    assert!((c - Vec3::new(0.0, 0.0, 500.0)).norm() < 5.0, "center={c:?}");
}

#[test]
fn ray_miss_falls_back_without_moving_center() {
    let config = EyeballConfig {
        eye_radius_mm: 2.0,
        ..EyeballConfig::default()
    };
    let mut model = EyeballModel::new(FrameSize::new(640, 480), &config).unwrap();
    let px = Pt2::new(320.0 + 1500.0, 240.0);

    let center = model.center();
    assert!(model.intersect_sphere(&model.cast_ray(px)).is_none());
    assert_eq!(model.update(px), UpdateOutcome::Missed);
    assert_eq!(model.center(), center);
    assert_eq!(model.observation_count(), 0);

    let gaze = model.gaze_data(px);
    assert!(!gaze.on_sphere);
    assert!(((gaze.pupil_3d - center).norm() - 2.0).abs() < 1e-9);
    assert!(gaze.single_angles.horizontal > 0.0);
    assert!(gaze.tilt_deg.is_finite());
    assert_eq!(model.center(), center);
}

#[test]
fn nan_pixels_propagate_to_output_only() {
    let mut model = vga_model();
    let px = Pt2::new(f64::NAN, 240.0);
    assert_eq!(model.update(px), UpdateOutcome::Missed);
    assert_eq!(model.center(), Vec3::new(0.0, 0.0, 500.0));
    let gaze = model.gaze_data(px);
    assert!(gaze.single_angles.horizontal.is_nan());
}

#[test]
fn trait_object_dispatch() {
    let mut model: Box<dyn GazeModel> = Box::new(vga_model());
    model.update(Pt2::new(320.0, 240.0));
    assert_eq!(model.observation_count(), 1);
    assert_eq!(model.eye_center(), Some(Vec3::new(0.0, 0.0, 500.0)));
    model.reset();
    assert_eq!(model.observation_count(), 0);
}
