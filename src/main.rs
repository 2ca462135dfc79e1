//! thing3d headless runner
//!
//! Loads the configured scene and runs a fixed number of frames against the
//! headless render backend, walking and jumping the player on a short
//! script. Positions are logged every `debug.log_interval` ticks.

use thing3d::config::AppConfig;
use thing3d::systems::{HeadlessBackend, SimulationSystem};
use thing3d::Engine;
use thing3d_core::SceneTemplate;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

const HEADLESS_DT: f32 = 1.0 / 60.0;

/// Key events fed to the engine at given ticks
const SCRIPT: &[(u32, KeyCode, ElementState)] = &[
    (60, KeyCode::KeyW, ElementState::Pressed),
    (120, KeyCode::KeyW, ElementState::Released),
    (150, KeyCode::Space, ElementState::Pressed),
    (151, KeyCode::Space, ElementState::Released),
    (180, KeyCode::KeyD, ElementState::Pressed),
    (210, KeyCode::KeyD, ElementState::Released),
];

fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let scene = SceneTemplate::load(&config.simulation.scene)?;

    let mut engine = Engine::new(&config, HeadlessBackend::new());
    engine.load_scene(&scene)?;

    let mut simulation = SimulationSystem::new()
        .with_max_frame_time(config.simulation.max_frame_time)
        .with_fixed_dt(Some(config.simulation.fixed_dt.unwrap_or(HEADLESS_DT)));

    let mut collisions = 0;
    for tick in 0..config.simulation.headless_ticks {
        for (_, key, state) in SCRIPT.iter().filter(|(at, _, _)| *at == tick) {
            engine.handle_key(*key, *state, false);
        }

        let report = simulation.update(&mut engine);
        collisions += report.collisions;

        let interval = config.debug.log_interval;
        if interval > 0 && tick % interval == 0 {
            for (id, thing) in engine.things.iter().filter(|(_, t)| t.body.is_dynamic()) {
                log::info!(
                    "tick {:>4} {} '{}' pos {:?} grounded {}",
                    tick,
                    id,
                    thing.name.as_deref().unwrap_or("-"),
                    thing.body.position,
                    thing.body.grounded
                );
            }
        }
    }

    let backend = engine.renderer.dispatcher().backend();
    log::info!(
        "Finished {} ticks: {} collisions, {} draws, {} vertices",
        config.simulation.headless_ticks,
        collisions,
        backend.draw_count(),
        backend.vertices_submitted()
    );
    Ok(())
}

fn main() {
    let config = AppConfig::load();
    let log_level = config.as_ref().map_or("info", |c| c.debug.log_level.as_str());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
    log::info!("Starting thing3d");

    let config = config.unwrap_or_else(|e| {
        log::warn!("{}; using defaults", e);
        AppConfig::default()
    });

    if let Err(e) = run(config) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
