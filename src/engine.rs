// Engine lifecycle
//
// Process-level setup that sits around the renderer: identifies the
// application and works out where its per-user files belong.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const LOG_TARGET: &str = "engine";

pub struct Engine {
    organization: String,
    name: String,
    config_dir: PathBuf,
}

impl Engine {
    pub fn init(organization: &str, name: &str) -> Result<Self> {
        log::info!(target: LOG_TARGET, "Initialized engine.");

        let dirs = ProjectDirs::from("", organization, name)
            .context("Failed to determine application directories")?;
        let config_dir = dirs.config_dir().to_owned();

        log::info!(target: LOG_TARGET, "Config path: {}", config_dir.display());

        Ok(Self {
            organization: organization.to_string(),
            name: name.to_string(),
            config_dir,
        })
    }

    pub fn quit(&self) {
        log::info!(target: LOG_TARGET, "Stopping engine.");
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Per-user configuration directory for this application. Not created.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}
