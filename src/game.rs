// =============================================================================
// GAME SHELL - init -> loop -> shutdown
// =============================================================================
//
// `Game` drives a caller-supplied `GameLogic` through the engine lifecycle:
//
// 1. Engine init
// 2. Window + renderer init (on the first resume)
// 3. on_load
// 4. Paced frames: on_update, then on_render
// 5. Renderer quit, engine quit
//
// =============================================================================

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::WindowId,
};

use crate::config::Config;
use crate::engine::Engine;
use crate::renderer::Renderer;

const LOG_TARGET: &str = "game";

/// The three hooks a game implements.
pub trait GameLogic {
    fn on_load(&mut self, control: &LoopControl);
    fn on_update(&mut self, control: &LoopControl, delta: f64);
    fn on_render(&mut self, control: &LoopControl, delta: f64);
}

/// Shared stop flag for the game loop.
#[derive(Debug, Clone, Default)]
pub struct LoopControl {
    stop: Arc<AtomicBool>,
}

impl LoopControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the loop to finish after the current frame.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }
}

/// Variable-timestep frame pacing with an optional rate cap.
#[derive(Debug)]
pub struct FramePacer {
    frame_time: Option<Duration>,
    last_frame: Option<Instant>,
}

impl FramePacer {
    /// `target_fps == 0` runs uncapped.
    pub fn new(target_fps: u32) -> Self {
        let frame_time =
            (target_fps > 0).then(|| Duration::from_nanos(1_000_000_000 / u64::from(target_fps)));
        Self {
            frame_time,
            last_frame: None,
        }
    }

    /// Seconds since the previous frame when a frame is due, `None` otherwise.
    /// The first tick is always due and reports a zero delta.
    pub fn tick(&mut self, now: Instant) -> Option<f64> {
        let Some(last) = self.last_frame else {
            self.last_frame = Some(now);
            return Some(0.0);
        };

        let elapsed = now.saturating_duration_since(last);
        if let Some(frame_time) = self.frame_time {
            if elapsed < frame_time {
                return None;
            }
        }

        self.last_frame = Some(now);
        Some(elapsed.as_secs_f64())
    }

    /// When the next frame becomes due, if the rate is capped.
    pub fn next_deadline(&self) -> Option<Instant> {
        Some(self.last_frame? + self.frame_time?)
    }

    pub fn control_flow(&self) -> ControlFlow {
        match self.next_deadline() {
            Some(deadline) => ControlFlow::WaitUntil(deadline),
            None => ControlFlow::Poll,
        }
    }
}

pub struct Game<L: GameLogic> {
    config: Config,
    logic: L,
    control: LoopControl,
}

impl<L: GameLogic> Game<L> {
    pub fn new(config: Config, logic: L) -> Self {
        Self {
            config,
            logic,
            control: LoopControl::new(),
        }
    }

    /// A handle that can stop the loop from outside the hooks.
    pub fn control(&self) -> LoopControl {
        self.control.clone()
    }

    pub fn stop(&self) {
        self.control.stop();
    }

    /// Run the game to completion. Returns the first fatal error.
    pub fn start(self) -> Result<()> {
        log::info!(target: LOG_TARGET, "Starting game.");

        let engine = Engine::init(&self.config.app.organization, &self.config.app.name)?;

        let event_loop = EventLoop::new()?;
        let mut runner = Runner {
            pacer: FramePacer::new(self.config.graphics.target_fps),
            config: self.config,
            logic: self.logic,
            control: self.control,
            renderer: Renderer::new(),
            error: None,
        };
        let result = event_loop.run_app(&mut runner);

        runner.renderer.quit();
        engine.quit();

        if let Some(err) = runner.error {
            return Err(err);
        }
        result?;
        Ok(())
    }
}

struct Runner<L: GameLogic> {
    config: Config,
    logic: L,
    control: LoopControl,
    renderer: Renderer,
    pacer: FramePacer,
    error: Option<anyhow::Error>,
}

impl<L: GameLogic> Runner<L> {
    fn frame(&mut self, now: Instant) {
        if let Some(delta) = self.pacer.tick(now) {
            self.logic.on_update(&self.control, delta);
            self.logic.on_render(&self.control, delta);
        }
    }
}

impl<L: GameLogic> ApplicationHandler for Runner<L> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.window().is_some() {
            return;
        }

        if let Err(e) = self.renderer.init(event_loop, &self.config) {
            log::error!(target: LOG_TARGET, "Failed to start renderer: {:#}", e);
            self.error = Some(e);
            event_loop.exit();
            return;
        }

        self.logic.on_load(&self.control);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!(target: LOG_TARGET, "Close requested, shutting down...");
                self.control.stop();
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.frame(Instant::now());
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.control.is_stopped() {
            event_loop.exit();
            return;
        }

        if let Some(window) = self.renderer.window() {
            if self.pacer.next_deadline().map_or(true, |d| Instant::now() >= d) {
                window.request_redraw();
            }
        }
        event_loop.set_control_flow(self.pacer.control_flow());
    }
}
