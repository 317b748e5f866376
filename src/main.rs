//! Headless Flamingo run
//!
//! Usage: `flamingo [config.ron|config.json] [frames]`

use flamingo::prelude::*;

/// Seconds between scripted light emissions
const EMIT_INTERVAL: u64 = 5;

/// Scripted player: mashes on every fourth frame, weaves around the pit and
/// emits light at a fixed interval.
fn autopilot(fps: u32) -> impl FnMut(&Time, &mut Input) {
    let emit_every = u64::from(fps.max(1)) * EMIT_INTERVAL;

    move |time, input| {
        let t = time.elapsed_seconds();
        input.set_axes(Vec2::new((t * 1.3).sin(), (t * 0.9).cos()));

        if time.frame() % 4 == 0 {
            input.tap(Action::Mash);
        }
        if time.frame() % emit_every == 0 {
            input.tap(Action::EmitLight);
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);

    let mut config = match args.next() {
        Some(path) => {
            log::info!("Loading configuration from {path}");
            GameConfig::load(&path)?
        }
        None => GameConfig::default(),
    };

    if let Some(frames) = args.next() {
        config.engine.max_frames = frames.parse()?;
    }

    let engine_config = EngineConfig::from(&config.engine);
    let fps = engine_config.target_fps;
    let game = FlamingoGame::new(config)?;

    let mut engine = Engine::new(engine_config, game).with_input_driver(autopilot(fps));
    let frames = engine.run();

    let game = engine.game();
    log::info!(
        "Finished after {frames} frames in state {:?}: {}",
        game.state(),
        serde_json::to_string(&game.stats())?
    );

    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("Flamingo error: {e}");
        eprintln!("Flamingo error: {e}");
        std::process::exit(1);
    }
}
