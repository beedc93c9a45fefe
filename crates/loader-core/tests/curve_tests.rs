use glam::Vec3;
use loader_core::{bezier3, CurvePath, CAMERA_FOCUS_POINTS, CAMERA_POSITION_POINTS};

fn sample_points() -> Vec<Vec3> {
    vec![
        Vec3::new(-2.0, 0.0, 1.0),
        Vec3::new(-1.0, 0.5, 3.0),
        Vec3::new(1.0, 0.2, 3.5),
        Vec3::new(2.0, -0.1, 0.5),
    ]
}

#[test]
fn endpoints_are_exact() {
    let points = sample_points();
    let path = CurvePath::new(points.clone());
    assert_eq!(path.at(0.0), points[0]);
    assert_eq!(path.at(1.0), *points.last().unwrap());
}

#[test]
fn parameter_clamps_outside_unit_range() {
    let points = sample_points();
    let path = CurvePath::new(points.clone());
    assert_eq!(path.at(-1.0), points[0]);
    assert_eq!(path.at(2.0), *points.last().unwrap());
}

#[test]
fn continuous_at_segment_boundaries() {
    let points = sample_points();
    let path = CurvePath::new(points.clone());
    let segments = points.len() - 1;
    for i in 1..segments {
        let boundary = i as f32 / segments as f32;
        let before = path.at(boundary - 1e-4);
        let after = path.at(boundary + 1e-4);
        assert!(
            before.distance(after) < 1e-2,
            "discontinuity at boundary {i}: {before:?} vs {after:?}"
        );
        // The curve passes through the interior control point itself.
        assert!(path.at(boundary).distance(points[i]) < 1e-4);
    }
}

#[test]
fn two_point_path_is_linear() {
    let a = Vec3::new(0.0, 0.0, 0.0);
    let b = Vec3::new(2.0, 4.0, -6.0);
    let path = CurvePath::new(vec![a, b]);
    let mid = path.at(0.5);
    assert!(mid.distance(Vec3::new(1.0, 2.0, -3.0)) < 1e-6);
}

#[test]
fn bezier3_endpoints_and_midpoint() {
    let a = Vec3::ZERO;
    let b = Vec3::new(1.0, 2.0, 0.0);
    let c = Vec3::new(2.0, 0.0, 0.0);
    assert_eq!(bezier3(a, b, c, 0.0), a);
    assert_eq!(bezier3(a, b, c, 1.0), c);
    // At t = 0.5 the blend is 1/4 a + 1/2 b + 1/4 c.
    let mid = bezier3(a, b, c, 0.5);
    assert!(mid.distance(Vec3::new(1.0, 1.0, 0.0)) < 1e-6);
}

#[test]
fn camera_paths_have_enough_points() {
    // Both built-in paths must satisfy the interpolator's contract.
    assert!(CAMERA_POSITION_POINTS.len() >= 2);
    assert!(CAMERA_FOCUS_POINTS.len() >= 2);
    let pos = CurvePath::new(CAMERA_POSITION_POINTS.to_vec());
    let focus = CurvePath::new(CAMERA_FOCUS_POINTS.to_vec());
    assert_eq!(pos.at(0.0), CAMERA_POSITION_POINTS[0]);
    assert_eq!(focus.at(1.0), CAMERA_FOCUS_POINTS[3]);
}
