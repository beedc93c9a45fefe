use std::time::Instant;
use winit::{event::*, event_loop::EventLoop, window::WindowBuilder};

use loader_core::{Config, Simulation};

mod assets;
mod error;
mod render;

/// Read `loading.toml` next to the binary if present; anything else falls
/// back to the built-in defaults.
fn load_config() -> Config {
    match std::fs::read_to_string("loading.toml") {
        Ok(text) => match toml::from_str(&text) {
            Ok(config) => {
                log::info!("loaded loading.toml");
                config
            }
            Err(e) => {
                log::warn!("loading.toml invalid ({e}); using defaults");
                Config::default()
            }
        },
        Err(_) => Config::default(),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = load_config();
    let mut sim = Simulation::new(config.clone())?;

    let event_loop = EventLoop::new().expect("event loop");
    let window = WindowBuilder::new()
        .with_title("Ring Loading Screen")
        .build(&event_loop)
        .expect("window");

    let mut state = pollster::block_on(render::GpuState::new(&window, &config, &sim))?;

    let mut last = Instant::now();
    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => state.resize(size),
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => elwt.exit(),
        Event::AboutToWait => {
            let now = Instant::now();
            let dt_ms = now.duration_since(last).as_secs_f64() * 1000.0;
            last = now;

            let frame = sim.tick(dt_ms);
            match state.render(&sim, &frame) {
                Ok(_) => state.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost) => {
                    let size = state.inner_size();
                    state.resize(size);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                Err(_) => {}
            }
        }
        _ => {}
    })
    .unwrap();
    Ok(())
}
