//! Piecewise curve evaluation for the camera paths.

use glam::Vec3;

/// Quadratic Bezier blend of three points at parameter `t` in [0, 1].
#[inline]
pub fn bezier3(a: Vec3, b: Vec3, c: Vec3, t: f32) -> Vec3 {
    let u = 1.0 - t;
    a * (u * u) + b * (2.0 * t * u) + c * (t * t)
}

/// A smooth path through an ordered list of control points.
///
/// The parameter range [0, 1] is divided evenly across the `n - 1` segments.
/// Each segment blends from its start point to its end point, so the curve
/// passes through every control point and is continuous at segment
/// boundaries. Interior segments bend toward the reflection of the incoming
/// direction; the first segment has no incoming direction and blends
/// linearly.
pub struct CurvePath {
    points: Vec<Vec3>,
}

impl CurvePath {
    pub fn new(points: Vec<Vec3>) -> Self {
        assert!(points.len() >= 2, "a curve path needs at least two points");
        Self { points }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let segments = self.points.len() - 1;
        let scaled = t * segments as f32;
        let index = (scaled.floor() as usize).min(segments - 1);
        let local = scaled - index as f32;

        let a = self.points[index];
        let b = self.points[index + 1];
        if index == 0 {
            a.lerp(b, local)
        } else {
            let prev = self.points[index - 1];
            let bend = a + (a - prev) * 0.5;
            bezier3(a, bend, b, local)
        }
    }
}
