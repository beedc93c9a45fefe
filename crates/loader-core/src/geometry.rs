//! Procedural ring geometry.
//!
//! Everything here runs once at startup: per-particle placement, timing
//! offsets, curve control points, and the static block mesh. Randomness
//! comes from the caller's RNG so a fixed seed reproduces the same
//! choreography.

use glam::{Mat3, Vec3};
use rand::rngs::StdRng;
use rand::Rng;
use std::f32::consts::TAU;

use crate::config::Config;
use crate::constants::BLOCK_HALF_EXTENTS;

/// One particle's static record, as generated at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// Scatter position before assembly begins. For ambient particles,
    /// the drift origin.
    pub position_initial: Vec3,
    /// Control point bending the approach path. Unused (zero) for ambient
    /// particles.
    pub position_swerve: Vec3,
    /// Resting position in the assembled ring. For ambient particles this
    /// holds the drift vector instead of a position.
    pub position_final: Vec3,
    /// Rotation of the owning slice about the vertical axis.
    pub slice_angle: f32,
    /// Delay before this particle's assembly animation begins.
    pub wait: f32,
    /// Per-particle random value reserved for shader-side hashing.
    pub seed: f32,
    pub ambient: bool,
}

/// Per-block instance data for the ring block overlay.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlockInstance {
    pub center: [f32; 3],
    pub angle: f32,
    pub wait: f32,
}

/// One vertex of the shared block cuboid mesh.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlockVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// One vertex of the screen-space logo quad.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LogoVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

pub struct Scene {
    pub particles: Vec<Particle>,
    pub blocks: Vec<BlockInstance>,
}

/// Generate every particle and block instance for the configured ring.
pub fn generate(config: &Config, rng: &mut StdRng) -> Scene {
    let mut particles = Vec::with_capacity(config.total_particles());
    let mut blocks = Vec::with_capacity(config.ring_particle_count());

    let offsets = slice_lattice_offsets(
        config.slice_width,
        config.slice_height(),
        config.slice_size,
    );
    debug_assert_eq!(offsets.len(), config.slice_particles as usize);

    for s in 0..config.ring_slices {
        let slice_angle = s as f32 * (TAU / config.ring_slices as f32);
        let rotation = Mat3::from_rotation_y(slice_angle);
        let outward = rotation * Vec3::X;
        let tangent = rotation * Vec3::Z;

        // Linear ramp across the assembly window plus bounded jitter, so
        // neighboring slices never assemble in lock-step.
        let ramp = (s as f32 / config.ring_slices as f32) * config.length_ring_assembly;
        let jitter = rng.gen_range(-1.0f32..1.0) * config.particle_wait_variation;
        let wait = (ramp + jitter).max(0.0);

        for &(dx, dy) in &offsets {
            let position_final = rotation * Vec3::new(config.ring_radius + dx, dy, 0.0);

            // Scatter outward and along the ring, biased away from the
            // band so assembly reads as a convergence.
            let scatter = outward * rng.gen_range(0.4..1.6)
                + tangent * rng.gen_range(-0.8..0.8)
                + Vec3::Y * rng.gen_range(-0.3..0.3);
            let position_initial = position_final + scatter;

            let position_swerve = swerve_point(position_initial, position_final, outward, rng);

            particles.push(Particle {
                position_initial,
                position_swerve,
                position_final,
                slice_angle,
                wait,
                seed: rng.gen(),
                ambient: false,
            });
            blocks.push(BlockInstance {
                center: position_final.to_array(),
                angle: slice_angle,
                wait,
            });
        }
    }

    let half_w = config.ambient_width * 0.5;
    let half_h = config.ambient_height * 0.5;
    for _ in 0..config.ambient_particles {
        let position_initial = Vec3::new(
            rng.gen_range(-half_w..half_w),
            rng.gen_range(-half_h..half_h),
            rng.gen_range(-half_w..half_w),
        );
        let drift = Vec3::new(
            rng.gen_range(-1.0f32..1.0),
            rng.gen_range(-1.0f32..1.0),
            rng.gen_range(-1.0f32..1.0),
        ) * config.ambient_drift;

        particles.push(Particle {
            position_initial,
            position_swerve: Vec3::ZERO,
            position_final: drift,
            slice_angle: 0.0,
            wait: 0.0,
            seed: rng.gen(),
            ambient: true,
        });
    }

    Scene { particles, blocks }
}

/// Control point bending the initial -> final chord into an arc: the chord
/// midpoint pushed sideways and slightly up.
fn swerve_point(initial: Vec3, final_pos: Vec3, outward: Vec3, rng: &mut StdRng) -> Vec3 {
    let chord = final_pos - initial;
    let mid = initial + chord * 0.5;
    let side = chord.cross(Vec3::Y);
    let side = if side.length_squared() > 1e-6 {
        side.normalize()
    } else {
        outward
    };
    mid + side * rng.gen_range(-0.5..0.5) + Vec3::Y * rng.gen_range(0.05..0.3)
}

/// Lattice offsets `(radial, vertical)` for one slice, centered on the ring
/// centerline. One- and two-row lattices fill the whole rectangle; taller
/// lattices keep only the perimeter.
pub fn slice_lattice_offsets(width: u32, height: u32, spacing: f32) -> Vec<(f32, f32)> {
    let cx = (width.saturating_sub(1)) as f32 * 0.5;
    let cy = (height.saturating_sub(1)) as f32 * 0.5;
    let mut offsets = Vec::new();
    for row in 0..height {
        for col in 0..width {
            let edge = row == 0 || row == height - 1 || col == 0 || col == width - 1;
            if height <= 2 || edge {
                offsets.push(((col as f32 - cx) * spacing, (row as f32 - cy) * spacing));
            }
        }
    }
    offsets
}

// Base cuboid corners, three vertices per triangle, two triangles per face.
// Faces carry distinct UVs, so no vertices are shared.
const CUBE_CORNERS: [[f32; 3]; 36] = [
    // front
    [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0], [-1.0, -1.0, 1.0], [1.0, -1.0, 1.0],
    // right
    [1.0, 1.0, 1.0], [1.0, -1.0, 1.0], [1.0, -1.0, -1.0],
    [1.0, 1.0, 1.0], [1.0, -1.0, -1.0], [1.0, 1.0, -1.0],
    // up
    [1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0],
    [1.0, 1.0, 1.0], [-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0],
    // left
    [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0], [-1.0, -1.0, -1.0],
    [-1.0, 1.0, 1.0], [-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0],
    // down
    [-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0],
    [-1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0],
    // back
    [1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0],
    [1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0],
];

const CUBE_UVS: [[f32; 2]; 36] = [
    // front
    [1.0, 1.0], [0.0, 1.0], [0.0, 0.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0],
    // right
    [0.0, 1.0], [0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0],
    // up
    [1.0, 1.0], [1.0, 0.0], [0.0, 0.0], [1.0, 1.0], [0.0, 0.0], [0.0, 1.0],
    // left
    [1.0, 1.0], [0.0, 1.0], [0.0, 0.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0],
    // down
    [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0], [1.0, 1.0], [0.0, 1.0],
    // back
    [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0], [1.0, 1.0], [0.0, 1.0],
];

/// The shared block cuboid mesh, in block-local space.
pub fn block_mesh() -> Vec<BlockVertex> {
    CUBE_CORNERS
        .iter()
        .zip(CUBE_UVS.iter())
        .map(|(corner, uv)| BlockVertex {
            position: [
                corner[0] * BLOCK_HALF_EXTENTS[0],
                corner[1] * BLOCK_HALF_EXTENTS[1],
                corner[2] * BLOCK_HALF_EXTENTS[2],
            ],
            uv: *uv,
        })
        .collect()
}

/// Screen-space logo quad anchored to the bottom-right corner, two
/// triangles in NDC. Horizontal padding is compressed to keep the visual
/// margin even on a widescreen surface.
pub fn logo_quad(scale: f32, padding: f32) -> [LogoVertex; 6] {
    let pad_v = padding;
    let pad_h = padding * 0.562;
    let left = 1.0 - 2.0 * scale - pad_h;
    let right = 1.0 - pad_h;
    let bottom = -1.0 + pad_v;
    let top = -1.0 + 2.0 * scale + pad_v;

    let v = |x: f32, y: f32, u: f32, w: f32| LogoVertex {
        position: [x, y],
        uv: [u, w],
    };
    [
        v(left, bottom, 0.0, 0.0),
        v(left, top, 0.0, 1.0),
        v(right, top, 1.0, 1.0),
        v(left, bottom, 0.0, 0.0),
        v(right, top, 1.0, 1.0),
        v(right, bottom, 1.0, 0.0),
    ]
}
