// =============================================================================
// EMBER - minimal game engine scaffold
// =============================================================================
//
// ARCHITECTURE OVERVIEW:
// ┌─────────────────────────────────────────────────────────────────┐
// │  Game (init -> paced loop -> shutdown)                          │
// │    ├── Engine (app identity, per-user dirs)                     │
// │    └── Renderer (window)                                        │
// │          └── Bootstrap: instance -> surface -> GPU -> device    │
// │                         -> swapchain -> image views             │
// └─────────────────────────────────────────────────────────────────┘
//
// =============================================================================

pub mod backend;
pub mod color;
pub mod config;
pub mod engine;
pub mod game;
pub mod logging;
pub mod renderer;

pub use color::Color;
pub use config::Config;
pub use engine::Engine;
pub use game::{FramePacer, Game, GameLogic, LoopControl};
pub use renderer::Renderer;
