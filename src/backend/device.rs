// Vulkan Device - Core GPU interface
//
// Responsibilities:
// - Logical device creation on the selected GPU
// - One queue from each resolved family (graphics, present)

use ash::vk;
use std::collections::BTreeSet;
use std::ffi::{c_char, CStr};
use std::sync::Arc;

use super::error::{BootstrapError, BootstrapResult};
use super::instance::VulkanInstance;
use super::queues::ResolvedQueues;
use super::selector::REQUIRED_DEVICE_FEATURES;

/// Logical device wrapper with automatic cleanup
pub struct VulkanDevice {
    pub device: ash::Device,
    pub physical_device: vk::PhysicalDevice,

    // Queue handles
    pub graphics_queue: vk::Queue,
    pub present_queue: vk::Queue,
    pub queues: ResolvedQueues,

    // Keeps the instance alive until the device is gone
    pub instance: Arc<VulkanInstance>,
}

impl VulkanDevice {
    /// Create the logical device.
    ///
    /// # Arguments
    /// * `extensions` - Device extensions to enable (at least swapchain)
    /// * `layers` - Validation layers, matching the instance's
    pub fn new(
        instance: Arc<VulkanInstance>,
        physical_device: vk::PhysicalDevice,
        queues: ResolvedQueues,
        extensions: &[&CStr],
        layers: &[&CStr],
    ) -> BootstrapResult<Arc<Self>> {
        log::debug!(target: "renderer", "Creating logical device");

        // Graphics and present may share a family; ask each family once.
        let families: BTreeSet<u32> = queues.unique_families().into_iter().collect();
        let queue_priorities = [1.0];
        let queue_create_infos: Vec<_> = families
            .iter()
            .map(|&family| {
                vk::DeviceQueueCreateInfo::default()
                    .queue_family_index(family)
                    .queue_priorities(&queue_priorities)
            })
            .collect();

        let extension_ptrs: Vec<*const c_char> = extensions.iter().map(|e| e.as_ptr()).collect();
        let layer_ptrs: Vec<*const c_char> = layers.iter().map(|l| l.as_ptr()).collect();

        // Device layers are deprecated but older loaders still honor them.
        #[allow(deprecated)]
        let create_info = vk::DeviceCreateInfo::default()
            .queue_create_infos(&queue_create_infos)
            .enabled_extension_names(&extension_ptrs)
            .enabled_layer_names(&layer_ptrs)
            .enabled_features(&REQUIRED_DEVICE_FEATURES);

        let device = unsafe {
            instance
                .instance
                .create_device(physical_device, &create_info, None)
        }
        .map_err(BootstrapError::LogicalDeviceCreation)?;

        let graphics_queue = unsafe { device.get_device_queue(queues.graphics, 0) };
        let present_queue = unsafe { device.get_device_queue(queues.present, 0) };

        log::debug!(target: "renderer", "Logical device created");

        Ok(Arc::new(Self {
            device,
            physical_device,
            graphics_queue,
            present_queue,
            queues,
            instance,
        }))
    }

    /// Wait for device to be idle (e.g., before cleanup)
    pub fn wait_idle(&self) -> Result<(), vk::Result> {
        unsafe { self.device.device_wait_idle() }
    }
}

impl Drop for VulkanDevice {
    fn drop(&mut self) {
        log::debug!(target: "renderer", "Destroying logical device");

        // Wait for device to finish
        let _ = self.wait_idle();

        unsafe { self.device.destroy_device(None) };
    }
}
