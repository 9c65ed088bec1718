// Renderer
//
// Owns the window and the Vulkan render context. `init` runs the full
// bring-up sequence once; `quit` releases everything in reverse order.

use anyhow::{Context, Result};
use std::sync::Arc;
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

use crate::backend::{self, RenderContext, VulkanDriver};
use crate::color::Color;
use crate::config::Config;

const LOG_TARGET: &str = "renderer";

#[derive(Default)]
pub struct Renderer {
    // Context before window: the surface must go before the window it targets.
    context: Option<RenderContext<VulkanDriver>>,
    window: Option<Arc<Window>>,
    clear_color: Color,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the window and bring up Vulkan on it.
    pub fn init(&mut self, event_loop: &ActiveEventLoop, config: &Config) -> Result<()> {
        log::info!(target: LOG_TARGET, "Starting vulkan renderer...");

        let attributes = WindowAttributes::default()
            .with_title(&config.window.title)
            .with_inner_size(PhysicalSize::new(config.window.width, config.window.height))
            .with_resizable(config.window.resizable);
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("Failed to create window")?,
        );

        let driver = VulkanDriver::new(window.clone(), &config.app.name)?;
        let context = backend::bootstrap(&driver, config.validation_enabled())
            .context("Failed to initialize Vulkan")?;

        log::info!(
            target: LOG_TARGET,
            "Swapchain ready: {:?}, {}x{}, {} images",
            context.swapchain_format(),
            context.swapchain_extent().width,
            context.swapchain_extent().height,
            context.image_views().len()
        );
        log::debug!(target: LOG_TARGET, "Clear color: {:?}", config.graphics.clear_color);

        self.clear_color = config.graphics.clear_color;
        self.context = Some(context);
        self.window = Some(window);

        log::info!(target: LOG_TARGET, "Renderer started.");
        Ok(())
    }

    pub fn quit(&mut self) {
        if self.context.is_none() {
            return;
        }
        log::info!(target: LOG_TARGET, "Cleaning up Vulkan resources...");
        self.context = None;
        self.window = None;
        log::info!(target: LOG_TARGET, "Cleanup complete");
    }

    pub fn context(&self) -> Option<&RenderContext<VulkanDriver>> {
        self.context.as_ref()
    }

    pub fn window(&self) -> Option<&Arc<Window>> {
        self.window.as_ref()
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        self.quit();
    }
}
