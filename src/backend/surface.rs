// Presentation surface
//
// The platform-specific drawing target bound to the window. Created through
// ash-window so every windowing backend winit supports works the same way.

use ash::vk;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle, RawDisplayHandle};
use std::ffi::CString;
use std::sync::Arc;
use winit::window::Window;

use super::error::{BootstrapError, BootstrapResult};
use super::instance::VulkanInstance;

pub struct Surface {
    pub surface: vk::SurfaceKHR,
    instance: Arc<VulkanInstance>,
    // The window must outlive the surface drawn into it.
    _window: Arc<Window>,
}

impl Surface {
    pub fn new(instance: Arc<VulkanInstance>, window: Arc<Window>) -> BootstrapResult<Self> {
        log::debug!(target: "renderer", "Creating surface");

        let display_handle = window
            .display_handle()
            .map_err(|e| BootstrapError::SurfaceCreation(format!("no display handle: {}", e)))?
            .as_raw();
        let window_handle = window
            .window_handle()
            .map_err(|e| BootstrapError::SurfaceCreation(format!("no window handle: {}", e)))?
            .as_raw();

        let surface = unsafe {
            ash_window::create_surface(
                &instance.entry,
                &instance.instance,
                display_handle,
                window_handle,
                None,
            )
        }
        .map_err(|e| BootstrapError::SurfaceCreation(e.to_string()))?;

        log::debug!(target: "renderer", "Surface created");

        Ok(Self {
            surface,
            instance,
            _window: window,
        })
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        unsafe {
            self.instance
                .surface_loader
                .destroy_surface(self.surface, None);
        }
    }
}

/// Instance extensions the platform needs to present to `window`.
pub fn required_extensions(window: &Window) -> BootstrapResult<Vec<CString>> {
    let display_handle: RawDisplayHandle = window
        .display_handle()
        .map_err(|e| BootstrapError::SurfaceCreation(format!("no display handle: {}", e)))?
        .as_raw();

    let names = ash_window::enumerate_required_extensions(display_handle)
        .map_err(BootstrapError::ExtensionEnumeration)?;

    Ok(names
        .iter()
        .map(|&ptr| unsafe { std::ffi::CStr::from_ptr(ptr) }.to_owned())
        .collect())
}

/// Current drawable size of the window, in physical pixels.
pub fn drawable_size(window: &Window) -> vk::Extent2D {
    let size = window.inner_size();
    vk::Extent2D {
        width: size.width,
        height: size.height,
    }
}
