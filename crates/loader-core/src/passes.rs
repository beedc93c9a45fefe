//! Per-frame update passes.
//!
//! Both passes are pure functions of the static buffers and the current
//! `Phase`: no hidden accumulation, so any frame can be reproduced from its
//! total time alone. Each pass writes the write-side of one ping-pong pair
//! and leaves the swap to the caller.

use glam::{Vec3, Vec4};

use crate::clock::Phase;
use crate::config::Config;
use crate::constants::{CAMERA_DISTANCE_MIN, CAMERA_DISTANCE_MIN_FADE};
use crate::curve::bezier3;
use crate::store::ParticleStore;

/// Assembly progress of a ring particle: 0 until its wait elapses, then a
/// linear ramp over the slice assembly length, clamped at 1.
pub fn assembly_factor(delay_time: f32, wait: f32, assembly_delay: f32, slice_assembly: f32) -> f32 {
    if delay_time <= wait {
        return 0.0;
    }
    ((delay_time - wait - assembly_delay) / slice_assembly).clamp(0.0, 1.0)
}

/// Drift progress of an ambient particle across one loop.
pub fn ambient_factor(delay_time: f32, length_loop: f32) -> f32 {
    (delay_time / length_loop).clamp(0.0, 1.0)
}

/// Near-clip softening: 0 at the near threshold, 1 past the fade distance.
pub fn proximity_scale(distance: f32) -> f32 {
    ((distance - CAMERA_DISTANCE_MIN) / (CAMERA_DISTANCE_MIN_FADE - CAMERA_DISTANCE_MIN))
        .clamp(0.0, 1.0)
}

/// Combined distance-dependent alpha scale for one particle.
pub fn alpha_distance_scale(config: &Config, distance: f32) -> f32 {
    let mut scale = 1.0;
    if config.enable_alpha_scaling {
        scale = 1.0 - (distance * config.camera_dist_factor) / config.camera_dist_max;
    }
    scale * proximity_scale(distance)
}

/// The piecewise fade curve shared by both particle kinds.
///
/// Before the start delay nothing is visible. In the final scene-fade
/// window of each loop everything fades out together. Ambient particles
/// otherwise fade in from loop start; ring particles fade in at their own
/// wait offset, hold, and fade out a fixed offset after their assembly
/// completes.
pub fn particle_alpha(
    config: &Config,
    delay_time: f32,
    wait: f32,
    ambient: bool,
    alpha_scale: f32,
) -> f32 {
    if delay_time <= 0.0 {
        return 0.0;
    }
    if delay_time > config.length_loop - config.length_scene_fade {
        let fade_out = ((config.length_loop - delay_time) / config.length_scene_fade).max(0.0);
        return fade_out * alpha_scale;
    }
    if ambient {
        let fade_in = (delay_time / config.length_particle_fade).min(1.0);
        return fade_in * alpha_scale;
    }
    if delay_time <= wait {
        return 0.0;
    }
    let fade_in = ((delay_time - wait) / config.length_particle_fade).min(1.0);
    let complete = wait
        + config.length_scene_fade
        + config.length_start_delay
        + config.length_slice_assembly;
    let fade_out = if delay_time > complete {
        (1.0 - (delay_time - complete) / config.length_particle_fade).max(0.0)
    } else {
        1.0
    };
    fade_in * fade_out * alpha_scale
}

/// Advance every particle's position for the given phase.
///
/// Ring particles follow the quadratic curve through their swerve point;
/// ambient particles drift linearly along their stored drift vector.
/// Trailing inert texels stay at the origin with factor 0.
pub fn run_position_pass(store: &mut ParticleStore, config: &Config, phase: &Phase) {
    let ParticleStore {
        position_initial,
        position_swerve,
        position_final,
        data_static,
        position,
        ..
    } = store;
    let (_, out) = position.frames();

    for i in 0..out.len() {
        let stat = data_static.texels()[i];
        let initial = position_initial.texels()[i].truncate();
        let final_texel = position_final.texels()[i].truncate();

        let pos = if stat.z == 1.0 {
            let f = ambient_factor(phase.delay_time, config.length_loop);
            initial + final_texel * f
        } else {
            let f = assembly_factor(
                phase.delay_time,
                stat.x,
                config.length_assembly_delay,
                config.length_slice_assembly,
            );
            bezier3(initial, position_swerve.texels()[i].truncate(), final_texel, f)
        };
        out[i] = pos.extend(1.0);
    }
}

/// Recompute every particle's alpha from the freshly-written positions.
///
/// Brightness is seeded at startup and carried through unchanged; the fade
/// math is fully time-derived and never reads the previous alpha.
pub fn run_data_pass(store: &mut ParticleStore, config: &Config, phase: &Phase, camera_pos: Vec3) {
    let ParticleStore {
        data_static,
        position,
        data_dynamic,
        ..
    } = store;
    let current = position.read();
    let (previous, out) = data_dynamic.frames();

    for i in 0..out.len() {
        let stat = data_static.texels()[i];
        let distance = current[i].truncate().distance(camera_pos);
        let scale = alpha_distance_scale(config, distance);
        let alpha = particle_alpha(config, phase.delay_time, stat.x, stat.z == 1.0, scale);
        out[i] = Vec4::new(alpha, previous[i].y, 1.0, 1.0);
    }
}
