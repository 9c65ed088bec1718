// Demo game: opens a window, brings up Vulkan and runs the frame loop until
// the window closes. Settings come from config.toml; RUST_LOG overrides the
// log level.

use anyhow::Result;
use ember::{Config, Game, GameLogic, LoopControl};

const LOG_TARGET: &str = "game";

/// Counts frames and reports the rate once a second.
struct DemoGame {
    frames: u32,
    elapsed: f64,
}

impl GameLogic for DemoGame {
    fn on_load(&mut self, _control: &LoopControl) {
        log::info!(target: LOG_TARGET, "Demo loaded.");
    }

    fn on_update(&mut self, _control: &LoopControl, delta: f64) {
        self.elapsed += delta;
        self.frames += 1;

        if self.elapsed >= 1.0 {
            log::debug!(
                target: LOG_TARGET,
                "FPS: {:.1}",
                f64::from(self.frames) / self.elapsed
            );
            self.frames = 0;
            self.elapsed = 0.0;
        }
    }

    fn on_render(&mut self, _control: &LoopControl, _delta: f64) {}
}

fn main() -> Result<()> {
    let config = Config::load();
    ember::logging::init(&config);

    log::info!(
        target: LOG_TARGET,
        "Window: {}x{} \"{}\"",
        config.window.width,
        config.window.height,
        config.window.title
    );

    let game = Game::new(
        config,
        DemoGame {
            frames: 0,
            elapsed: 0.0,
        },
    );
    game.start()
}
