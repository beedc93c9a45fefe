//! Double-buffered particle state.
//!
//! Each field group is a flat buffer of RGBA texels addressed by particle
//! index, sized `texture_size^2` with trailing texels zeroed. Static groups
//! are written once at startup; dynamic groups are ping-pong pairs where a
//! pass reads the previous frame's buffer and writes the next frame's, then
//! the owner swaps the two by reference. Holding `read` and `write` as
//! separate fields lets the borrow checker enforce the one-writer-per-frame
//! discipline the layout depends on.

use glam::Vec4;

use crate::geometry::Particle;

/// One ping-pong buffer pair.
pub struct PingPong {
    read: Vec<Vec4>,
    write: Vec<Vec4>,
}

impl PingPong {
    pub fn new(len: usize) -> Self {
        Self {
            read: vec![Vec4::ZERO; len],
            write: vec![Vec4::ZERO; len],
        }
    }

    pub fn read(&self) -> &[Vec4] {
        &self.read
    }

    /// Previous-frame and next-frame buffers, borrowed together for a pass.
    pub fn frames(&mut self) -> (&[Vec4], &mut [Vec4]) {
        (&self.read, &mut self.write)
    }

    /// Exchange the read/write roles. O(1) pointer exchange, no copy.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.read, &mut self.write);
    }

    fn seed(&mut self, texels: Vec<Vec4>) {
        self.write = texels.clone();
        self.read = texels;
    }
}

/// Field group written once at startup.
pub struct StaticField {
    texels: Vec<Vec4>,
}

impl StaticField {
    pub fn texels(&self) -> &[Vec4] {
        &self.texels
    }
}

/// All per-particle state, one texel per particle per group.
///
/// `data_static` texels hold `(wait, seed, ambient_flag, 1)`; `data_dynamic`
/// texels hold `(alpha, brightness, 1, 1)`. Position texels carry w = 1.
pub struct ParticleStore {
    pub position_initial: StaticField,
    pub position_swerve: StaticField,
    pub position_final: StaticField,
    pub data_static: StaticField,
    pub position: PingPong,
    pub data_dynamic: PingPong,
    pub texture_size: usize,
}

impl ParticleStore {
    pub fn from_particles(texture_size: usize, particles: &[Particle]) -> Self {
        let len = texture_size * texture_size;
        debug_assert!(particles.len() <= len);

        let mut position_initial = vec![Vec4::ZERO; len];
        let mut position_swerve = vec![Vec4::ZERO; len];
        let mut position_final = vec![Vec4::ZERO; len];
        let mut data_static = vec![Vec4::ZERO; len];
        let mut position = vec![Vec4::ZERO; len];
        let mut data_dynamic = vec![Vec4::ZERO; len];

        for (i, p) in particles.iter().enumerate() {
            position_initial[i] = p.position_initial.extend(1.0);
            position_swerve[i] = p.position_swerve.extend(1.0);
            position_final[i] = p.position_final.extend(1.0);
            let ambient = if p.ambient { 1.0 } else { 0.0 };
            data_static[i] = Vec4::new(p.wait, p.seed, ambient, 1.0);
            position[i] = p.position_initial.extend(1.0);
            data_dynamic[i] = Vec4::new(0.0, 1.0, 1.0, 1.0);
        }

        let mut store = Self {
            position_initial: StaticField {
                texels: position_initial,
            },
            position_swerve: StaticField {
                texels: position_swerve,
            },
            position_final: StaticField {
                texels: position_final,
            },
            data_static: StaticField { texels: data_static },
            position: PingPong::new(len),
            data_dynamic: PingPong::new(len),
            texture_size,
        };
        store.position.seed(position);
        store.data_dynamic.seed(data_dynamic);
        store
    }
}
