// Vulkan driver - the real backend behind the bootstrap sequence
//
// Loads the Vulkan library once and creates each handle through the RAII
// wrappers in this module's siblings.

use ash::{vk, Entry};
use std::ffi::{CStr, CString};
use std::sync::Arc;
use winit::window::Window;

use super::bootstrap::{Driver, PresentImages};
use super::error::{BootstrapError, BootstrapResult};
use super::instance::{DebugMessenger, VulkanInstance};
use super::query::{self, DeviceQuery};
use super::queues::ResolvedQueues;
use super::surface::{self, Surface};
use super::swapchain::{Swapchain, SwapchainConfig};
use super::VulkanDevice;

pub struct VulkanDriver {
    entry: Entry,
    window: Arc<Window>,
    app_name: CString,
}

impl VulkanDriver {
    pub fn new(window: Arc<Window>, app_name: &str) -> BootstrapResult<Self> {
        let entry = unsafe { Entry::load() }
            .map_err(|e| BootstrapError::LoaderUnavailable(e.to_string()))?;
        // Interior NULs cannot be passed to the driver; drop them.
        let app_name = CString::new(app_name.replace('\0', "")).unwrap_or_default();

        Ok(Self {
            entry,
            window,
            app_name,
        })
    }
}

impl PresentImages for Swapchain {
    fn images(&self) -> &[vk::Image] {
        &self.images
    }

    fn image_views(&self) -> &[vk::ImageView] {
        &self.image_views
    }
}

impl Driver for VulkanDriver {
    type Instance = Arc<VulkanInstance>;
    type DebugHook = DebugMessenger;
    type Surface = Surface;
    type Device = Arc<VulkanDevice>;
    type Swapchain = Swapchain;

    fn available_layers(&self) -> BootstrapResult<Vec<CString>> {
        let layers = unsafe { self.entry.enumerate_instance_layer_properties() }
            .map_err(BootstrapError::LayerEnumeration)?;
        Ok(layers
            .iter()
            .map(|layer| query::fixed_name(&layer.layer_name).to_owned())
            .collect())
    }

    fn available_instance_extensions(&self) -> BootstrapResult<Vec<CString>> {
        let extensions = unsafe { self.entry.enumerate_instance_extension_properties(None) }
            .map_err(BootstrapError::ExtensionEnumeration)?;
        Ok(extensions
            .iter()
            .map(|ext| query::fixed_name(&ext.extension_name).to_owned())
            .collect())
    }

    fn required_instance_extensions(&self) -> BootstrapResult<Vec<CString>> {
        surface::required_extensions(&self.window)
    }

    fn create_instance(&self, extensions: &[&CStr], layers: &[&CStr]) -> BootstrapResult<Self::Instance> {
        VulkanInstance::new(&self.entry, &self.app_name, extensions, layers)
    }

    fn install_debug_hook(&self, instance: &Self::Instance) -> Option<Self::DebugHook> {
        match DebugMessenger::new(instance.clone()) {
            Ok(messenger) => Some(messenger),
            Err(err) => {
                log::warn!(target: "renderer", "Failed to install debug messenger: {}", err);
                None
            }
        }
    }

    fn create_surface(&self, instance: &Self::Instance) -> BootstrapResult<Self::Surface> {
        Surface::new(instance.clone(), self.window.clone())
    }

    fn surface_handle(surface: &Self::Surface) -> vk::SurfaceKHR {
        surface.surface
    }

    fn query<'a>(&self, instance: &'a Self::Instance) -> &'a dyn DeviceQuery {
        &**instance
    }

    fn drawable_size(&self) -> vk::Extent2D {
        surface::drawable_size(&self.window)
    }

    fn create_device(
        &self,
        instance: &Self::Instance,
        physical_device: vk::PhysicalDevice,
        queues: ResolvedQueues,
        extensions: &[&CStr],
        layers: &[&CStr],
    ) -> BootstrapResult<Self::Device> {
        VulkanDevice::new(instance.clone(), physical_device, queues, extensions, layers)
    }

    fn device_queues(device: &Self::Device) -> (vk::Queue, vk::Queue) {
        (device.graphics_queue, device.present_queue)
    }

    fn create_swapchain(
        &self,
        device: &Self::Device,
        surface: &Self::Surface,
        config: &SwapchainConfig,
    ) -> BootstrapResult<Self::Swapchain> {
        Swapchain::new(device.clone(), surface.surface, config)
    }

    fn create_image_views(&self, swapchain: &mut Self::Swapchain) -> BootstrapResult<()> {
        swapchain.create_image_views()
    }
}
