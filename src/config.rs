// =============================================================================
// CONFIGURATION - Load settings from config.toml
// =============================================================================
//
// This module handles loading and parsing configuration from config.toml.
// Provides sensible defaults if config file is missing or has errors.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::color::Color;

/// Root configuration structure
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub app: AppConfig,
    pub window: WindowConfig,
    pub graphics: GraphicsConfig,
    pub debug: DebugConfig,
}

/// Who we are, for the driver and the per-user config directory
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub organization: String,
    pub name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            organization: "Ember".to_string(),
            name: "EmberGame".to_string(),
        }
    }
}

/// Window settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Ember".to_string(),
            width: 640,
            height: 480,
            resizable: false,
        }
    }
}

/// Graphics settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GraphicsConfig {
    pub clear_color: Color,
    /// Frame cap for the game loop; 0 runs uncapped.
    pub target_fps: u32,
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            clear_color: Color::from([0.1, 0.2, 0.8, 1.0]),
            target_fps: 60,
        }
    }
}

/// Debug settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Only honored in debug builds.
    pub validation_layers: bool,
    pub log_level: String,
    pub log_to_file: bool,
    pub log_file: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            validation_layers: true,
            log_level: "info".to_string(),
            log_to_file: false,
            log_file: "ember.log".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults if not found
    pub fn load() -> Self {
        Self::load_from_path("config.toml").unwrap_or_else(|e| {
            log::warn!(target: "engine", "Failed to load config.toml: {:#}. Using defaults.", e);
            Config::default()
        })
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!(target: "engine", "Config file not found at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        log::info!(target: "engine", "Loaded configuration from {:?}", path);
        log::debug!(target: "engine", "Config: {:?}", config);

        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Validation is a debug-build feature; release builds never enable it.
    pub fn validation_enabled(&self) -> bool {
        cfg!(debug_assertions) && self.debug.validation_layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 480);
        assert_eq!(config.graphics.target_fps, 60);
        assert_eq!(config.app.name, "EmberGame");
        assert!(config.debug.validation_layers);
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::parse(
            r#"
            [app]
            organization = "Ryozuki"
            name = "SuperGame"

            [window]
            width = 1920

            [graphics]
            clear_color = [1.0, 0.0, 0.0, 1.0]
            target_fps = 0

            [debug]
            validation_layers = false
            "#,
        )
        .unwrap();

        assert_eq!(config.app.organization, "Ryozuki");
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.window.height, 480);
        assert_eq!(config.graphics.clear_color, Color::RED);
        assert_eq!(config.graphics.target_fps, 0);
        assert!(!config.validation_enabled());
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_invalid_config() {
        assert!(Config::parse("[window]\nwidth = \"wide\"").is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load_from_path("does/not/exist.toml").unwrap();
        assert_eq!(config.window.title, "Ember");
    }
}
