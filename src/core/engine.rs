//! Core Engine struct and headless game loop

use std::time::Duration;

use crate::core::{EngineSettings, EventQueue, Time};
use crate::input::Input;

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Name logged at startup
    pub title: String,
    /// Simulated frames per second
    pub target_fps: u32,
    /// Stop after this many frames (0 for no limit)
    pub max_frames: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from(&EngineSettings::default())
    }
}

impl From<&EngineSettings> for EngineConfig {
    fn from(settings: &EngineSettings) -> Self {
        Self {
            title: settings.title.clone(),
            target_fps: settings.target_fps,
            max_frames: settings.max_frames,
        }
    }
}

impl EngineConfig {
    /// Create a new config with a title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set target FPS
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    /// Set the frame limit
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = frames;
        self
    }

    /// Length of one simulated frame. A zero FPS falls back to 60.
    pub fn frame_duration(&self) -> Duration {
        let fps = if self.target_fps == 0 { 60 } else { self.target_fps };
        Duration::from_secs_f64(1.0 / f64::from(fps))
    }
}

/// Game trait that users implement
pub trait Game: 'static {
    /// Called once before the first frame
    fn init(&mut self, engine: &mut EngineContext);

    /// Called every frame for game logic updates
    fn update(&mut self, engine: &mut EngineContext);

    /// Called once when the loop ends
    fn shutdown(&mut self, _engine: &mut EngineContext) {}
}

/// Writes host input for the coming frame.
pub type InputDriver = Box<dyn FnMut(&Time, &mut Input)>;

/// Context passed to game callbacks
#[derive(Debug, Default)]
pub struct EngineContext {
    /// Time tracking
    pub time: Time,
    /// Input state
    pub input: Input,
    /// Events pushed by gameplay systems
    pub events: EventQueue,
    /// Should the engine quit
    should_quit: bool,
}

impl EngineContext {
    /// Create an empty context at frame 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Check if engine should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

/// Main engine struct
pub struct Engine<G: Game> {
    config: EngineConfig,
    game: G,
    context: EngineContext,
    input_driver: Option<InputDriver>,
    initialized: bool,
}

impl<G: Game> Engine<G> {
    /// Create a new engine with the given game
    pub fn new(config: EngineConfig, game: G) -> Self {
        Self {
            config,
            game,
            context: EngineContext::new(),
            input_driver: None,
            initialized: false,
        }
    }

    /// Feed input before every frame
    #[must_use]
    pub fn with_input_driver(mut self, driver: impl FnMut(&Time, &mut Input) + 'static) -> Self {
        self.input_driver = Some(Box::new(driver));
        self
    }

    /// Run frames until the game quits or the frame limit is reached, then shut down.
    ///
    /// Returns the number of frames simulated.
    pub fn run(&mut self) -> u64 {
        log::info!(
            "Starting engine: {} ({} fps, frame limit {})",
            self.config.title,
            self.config.target_fps,
            self.config.max_frames
        );

        let start = self.context.time.frame();
        loop {
            let limit_reached = self.config.max_frames > 0
                && self.context.time.frame() - start >= self.config.max_frames;
            if limit_reached || !self.step() {
                break;
            }
        }

        log::info!("Close requested, shutting down");
        self.game.shutdown(&mut self.context);
        self.context.time.frame() - start
    }

    /// Simulate one frame. Returns `false` once the game has asked to quit.
    pub fn step(&mut self) -> bool {
        if self.context.should_quit() {
            return false;
        }

        if !self.initialized {
            self.game.init(&mut self.context);
            self.initialized = true;
            log::info!("Engine initialized successfully");
        }

        // Update time
        self.context.time.advance(self.config.frame_duration());

        // Previous frame's events become readable
        self.context.events.swap();

        if let Some(driver) = self.input_driver.as_mut() {
            driver(&self.context.time, &mut self.context.input);
        }

        // Update game logic
        self.game.update(&mut self.context);

        // Clear per-frame input state
        self.context.input.update();

        !self.context.should_quit()
    }

    /// The game being run
    pub fn game(&self) -> &G {
        &self.game
    }

    /// The game being run, mutably
    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    /// Engine context
    pub fn context(&self) -> &EngineContext {
        &self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameEvent;
    use crate::input::Action;

    #[derive(Default)]
    struct Counter {
        inits: u32,
        updates: u32,
        mashes: u32,
        shutdowns: u32,
        quit_after: Option<u32>,
        seen_events: usize,
    }

    impl Game for Counter {
        fn init(&mut self, _engine: &mut EngineContext) {
            self.inits += 1;
        }

        fn update(&mut self, engine: &mut EngineContext) {
            self.updates += 1;
            self.seen_events += engine.events.len();
            if engine.input.is_just_pressed(Action::Mash) {
                self.mashes += 1;
            }
            engine.events.push(GameEvent::StateChanged { state: "tick" });

            if self.quit_after == Some(self.updates) {
                engine.quit();
            }
        }

        fn shutdown(&mut self, _engine: &mut EngineContext) {
            self.shutdowns += 1;
        }
    }

    #[test]
    fn test_frame_duration() {
        let config = EngineConfig::default().with_target_fps(50);
        assert_eq!(config.frame_duration(), Duration::from_millis(20));
    }

    #[test]
    fn test_run_stops_at_frame_limit() {
        let config = EngineConfig::default().with_max_frames(10);
        let mut engine = Engine::new(config, Counter::default());

        assert_eq!(engine.run(), 10);

        let game = engine.game();
        assert_eq!(game.inits, 1);
        assert_eq!(game.updates, 10);
        assert_eq!(game.shutdowns, 1);
        assert_eq!(game.seen_events, 9, "events arrive one frame later");
        assert_eq!(engine.context().time.frame(), 10);
    }

    #[test]
    fn test_game_can_quit() {
        let game = Counter {
            quit_after: Some(3),
            ..Default::default()
        };
        let mut engine = Engine::new(EngineConfig::default().with_max_frames(100), game);

        assert_eq!(engine.run(), 3);
        assert!(!engine.step());
    }

    #[test]
    fn test_input_driver_feeds_frames() {
        let config = EngineConfig::default().with_max_frames(6);
        let mut engine = Engine::new(config, Counter::default()).with_input_driver(|time, input| {
            if time.frame() % 2 == 0 {
                input.tap(Action::Mash);
            }
        });

        engine.run();
        assert_eq!(engine.game().mashes, 3);
    }
}
