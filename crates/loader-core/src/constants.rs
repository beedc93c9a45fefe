use glam::Vec3;

// Shared tuning constants used by the simulation and the render front-end.

// Camera flight path. Both paths are traversed once per loop as the loop
// factor advances from 0 to 1.
pub const CAMERA_POSITION_POINTS: [Vec3; 5] = [
    Vec3::new(-2.4, -0.2, 1.8),
    Vec3::new(-2.1, 0.05, 3.0),
    Vec3::new(0.5, 0.15, 5.2),
    Vec3::new(2.2, 0.25, 2.0),
    Vec3::new(2.5, 0.15, 1.0),
];

pub const CAMERA_FOCUS_POINTS: [Vec3; 4] = [
    Vec3::new(-3.0, 0.0, 0.0),
    Vec3::new(-2.1, 0.0, 3.3),
    Vec3::new(2.8, -0.02, 3.3),
    Vec3::new(3.0, -0.1, -0.5),
];

// Static camera perpendicular to slice 0, for inspecting slice layout.
pub const DEVELOPER_CAMERA_EYE: Vec3 = Vec3::new(-3.3, 0.0, 0.0);
pub const DEVELOPER_CAMERA_FOCUS: Vec3 = Vec3::new(-3.0, 0.0, 0.0);

// Projection
pub const CAMERA_FOV_DEGREES: f32 = 50.0;
pub const CAMERA_NEAR: f32 = 0.02;
pub const CAMERA_FAR: f32 = 10_000.0;

// Near-clip softening thresholds: alpha ramps 0 -> 1 between these two
// camera distances so particles never pop at the near plane.
pub const CAMERA_DISTANCE_MIN: f32 = 0.05;
pub const CAMERA_DISTANCE_MIN_FADE: f32 = 0.5;

// Half extents of one ring block cuboid. The z extent runs along the ring
// tangent, so blocks read as elongated segments of the band.
pub const BLOCK_HALF_EXTENTS: [f32; 3] = [0.0029, 0.003_052_35, 0.004_845];

// Blocks become visible this long after their particle's assembly ends.
pub const BLOCK_APPEARANCE_LAG: f32 = 50.0;
