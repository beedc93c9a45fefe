//! Simulation context: owns the config, clock, state store, and camera
//! paths, and runs the per-frame pass sequence.

use glam::{Vec3, Vec4};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::clock::{AnimationClock, Phase};
use crate::config::{Config, ConfigError};
use crate::constants::{
    CAMERA_FOCUS_POINTS, CAMERA_POSITION_POINTS, DEVELOPER_CAMERA_EYE, DEVELOPER_CAMERA_FOCUS,
};
use crate::curve::CurvePath;
use crate::geometry::{self, BlockInstance};
use crate::passes;
use crate::store::ParticleStore;

/// Everything the renderer needs about one simulated frame.
#[derive(Clone, Copy, Debug)]
pub struct Frame {
    pub phase: Phase,
    pub camera_eye: Vec3,
    pub camera_focus: Vec3,
}

pub struct Simulation {
    config: Config,
    clock: AnimationClock,
    store: ParticleStore,
    blocks: Vec<BlockInstance>,
    particle_count: usize,
    camera_position: CurvePath,
    camera_focus: CurvePath,
}

impl Simulation {
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let scene = geometry::generate(&config, &mut rng);
        let particle_count = scene.particles.len();
        let store = ParticleStore::from_particles(config.texture_size(), &scene.particles);
        log::info!(
            "simulation ready: {} ring + {} ambient particles in {}x{} state buffers",
            config.ring_particle_count(),
            config.ambient_particles,
            config.texture_size(),
            config.texture_size(),
        );

        Ok(Self {
            clock: AnimationClock::new(config.speed),
            store,
            blocks: scene.blocks,
            particle_count,
            camera_position: CurvePath::new(CAMERA_POSITION_POINTS.to_vec()),
            camera_focus: CurvePath::new(CAMERA_FOCUS_POINTS.to_vec()),
            config,
        })
    }

    /// Advance the clock by a wall-clock delta and run both update passes.
    ///
    /// Frame order is fixed: camera, position pass, swap, data pass, swap.
    /// The data pass reads the position buffer written this frame.
    pub fn tick(&mut self, dt_ms: f64) -> Frame {
        self.clock.advance(dt_ms);
        let phase = Phase::of(self.clock.now(), &self.config);

        let (camera_eye, camera_focus) = if self.config.enable_developer_camera {
            (DEVELOPER_CAMERA_EYE, DEVELOPER_CAMERA_FOCUS)
        } else {
            (
                self.camera_position.at(phase.loop_factor),
                self.camera_focus.at(phase.loop_factor),
            )
        };

        passes::run_position_pass(&mut self.store, &self.config, &phase);
        self.store.position.swap();
        passes::run_data_pass(&mut self.store, &self.config, &phase, camera_eye);
        self.store.data_dynamic.swap();

        Frame {
            phase,
            camera_eye,
            camera_focus,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of live particles; trailing store texels beyond this are inert.
    pub fn particle_count(&self) -> usize {
        self.particle_count
    }

    pub fn positions(&self) -> &[Vec4] {
        self.store.position.read()
    }

    pub fn dynamic_data(&self) -> &[Vec4] {
        self.store.data_dynamic.read()
    }

    pub fn static_data(&self) -> &[Vec4] {
        self.store.data_static.texels()
    }

    pub fn blocks(&self) -> &[BlockInstance] {
        &self.blocks
    }

    pub fn store_mut(&mut self) -> &mut ParticleStore {
        &mut self.store
    }
}
