//! Load-time configuration for the whole animation.
//!
//! Every option is read once at startup; there is no runtime reconfiguration.
//! Defaults reproduce the reference choreography, so a front-end with no
//! config file gets the full animation out of the box.

use serde::Deserialize;
use thiserror::Error;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Global time multiplier applied to wall-clock deltas.
    pub speed: f32,
    /// Length of the full animation loop, in milliseconds.
    pub length_loop: f32,
    /// Time between startup and animation start.
    pub length_start_delay: f32,
    /// Time between animation start and ring assembly start.
    pub length_assembly_delay: f32,
    /// Window across which per-slice waits ramp from 0 to max.
    pub length_ring_assembly: f32,
    /// Flight duration of a single particle along its curve.
    pub length_slice_assembly: f32,
    /// Particle fade-in/out duration.
    pub length_particle_fade: f32,
    /// Block fade-in duration.
    pub length_block_fade: f32,
    /// Block highlight pulse duration.
    pub length_block_highlight: f32,
    /// End-of-loop scene fade-out duration.
    pub length_scene_fade: f32,

    pub background_color: [f32; 4],

    /// Number of angular slices in the assembled ring.
    pub ring_slices: u32,
    pub ring_radius: f32,

    /// Free-drifting background particle count.
    pub ambient_particles: u32,
    /// Horizontal extent (x and z) of the ambient particle box.
    pub ambient_width: f32,
    /// Vertical extent (y) of the ambient particle box.
    pub ambient_height: f32,
    /// Scale of each ambient particle's drift vector.
    pub ambient_drift: f32,

    /// Particles per slice; must be even.
    pub slice_particles: u32,
    /// Distance between neighboring slice particles.
    pub slice_size: f32,
    /// Number of particles on the top and bottom edges of the slice lattice.
    pub slice_width: u32,

    /// Base point size in pixels.
    pub particle_size: f32,
    /// Random flux added to each slice's wait, in milliseconds.
    pub particle_wait_variation: f32,
    /// Clamp max point size when distance scaling is enabled.
    pub particle_size_clamp: bool,

    /// Maximum distance particles are expected to be from the camera.
    pub camera_dist_max: f32,
    /// Multiplier for camera-distance dependent effects.
    pub camera_dist_factor: f32,

    /// Logo size relative to screen size.
    pub logo_scale: f32,
    /// Logo padding relative to screen size.
    pub logo_padding: f32,

    pub enable_block_rendering: bool,
    /// Places the camera statically perpendicular to slice 0.
    pub enable_developer_camera: bool,
    /// Point size falls off with camera distance.
    pub enable_particle_scaling: bool,
    /// Alpha falls off with camera distance.
    pub enable_alpha_scaling: bool,
    pub enable_logo: bool,

    /// Fixed seed for geometry generation; omit for run-to-run variation.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            speed: 1.0,
            length_loop: 80_000.0,
            length_start_delay: 600.0,
            length_assembly_delay: 2_000.0,
            length_ring_assembly: 71_000.0,
            length_slice_assembly: 23.0,
            length_particle_fade: 1_000.0,
            length_block_fade: 70.0,
            length_block_highlight: 1_000.0,
            length_scene_fade: 1_500.0,
            background_color: [0.1, 0.115, 0.15, 1.0],
            ring_slices: 1_950,
            ring_radius: 3.0,
            ambient_particles: 20_000,
            ambient_width: 5.0,
            ambient_height: 1.2,
            ambient_drift: 0.8,
            slice_particles: 62,
            slice_size: 0.006,
            slice_width: 4,
            particle_size: 2.4,
            particle_wait_variation: 500.0,
            particle_size_clamp: false,
            camera_dist_max: 14.0,
            camera_dist_factor: 1.65,
            logo_scale: 0.325,
            logo_padding: 0.2,
            enable_block_rendering: true,
            enable_developer_camera: false,
            enable_particle_scaling: true,
            enable_alpha_scaling: true,
            enable_logo: true,
            seed: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("slice_particles must be even and nonzero, got {0}")]
    BadSliceParticles(u32),
    #[error("slice_width {width} does not tile {particles} particles per slice")]
    BadSliceWidth { width: u32, particles: u32 },
    #[error("ring_slices must be nonzero")]
    NoSlices,
    #[error("{name} must be positive")]
    NonPositive { name: &'static str },
}

impl Config {
    /// Rows in the slice lattice. One and two rows are explicit special
    /// cases; otherwise the lattice is the perimeter of a rectangle and
    /// `2*w + 2*(h-2) == slice_particles` holds.
    pub fn slice_height(&self) -> u32 {
        if self.slice_width == self.slice_particles {
            1
        } else if self.slice_width == self.slice_particles / 2 {
            2
        } else {
            self.slice_particles / 2 - self.slice_width + 2
        }
    }

    pub fn ring_particle_count(&self) -> usize {
        self.ring_slices as usize * self.slice_particles as usize
    }

    pub fn total_particles(&self) -> usize {
        self.ring_particle_count() + self.ambient_particles as usize
    }

    /// Side length of the square state buffers. Every particle owns one
    /// texel; trailing texels stay zeroed and inert.
    pub fn texture_size(&self) -> usize {
        (self.total_particles() as f64).sqrt().ceil() as usize
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slice_particles == 0 || self.slice_particles % 2 != 0 {
            return Err(ConfigError::BadSliceParticles(self.slice_particles));
        }
        if self.ring_slices == 0 {
            return Err(ConfigError::NoSlices);
        }
        let w = self.slice_width;
        let p = self.slice_particles;
        if w == 0 || (w > p / 2 && w != p) {
            return Err(ConfigError::BadSliceWidth { width: w, particles: p });
        }
        for (name, value) in [
            ("speed", self.speed),
            ("length_loop", self.length_loop),
            ("length_slice_assembly", self.length_slice_assembly),
            ("length_particle_fade", self.length_particle_fade),
            ("length_block_fade", self.length_block_fade),
            ("length_block_highlight", self.length_block_highlight),
            ("length_scene_fade", self.length_scene_fade),
            ("camera_dist_max", self.camera_dist_max),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { name });
            }
        }
        Ok(())
    }
}
