// Device capability queries
//
// Capability data for a physical device is read on demand through
// `DeviceQuery` and never cached by the candidate itself. The instance
// implementation is a thin pass-through to the driver; tests supply a fake.

use ash::vk;
use std::ffi::{c_char, CStr};

use super::instance::VulkanInstance;
use super::swapchain::SwapchainSupport;

pub trait DeviceQuery {
    /// Every GPU exposed by the instance, in driver enumeration order.
    fn physical_devices(&self) -> Result<Vec<vk::PhysicalDevice>, vk::Result>;

    fn properties(&self, device: vk::PhysicalDevice) -> vk::PhysicalDeviceProperties;

    fn features(&self, device: vk::PhysicalDevice) -> vk::PhysicalDeviceFeatures;

    fn queue_families(&self, device: vk::PhysicalDevice) -> Vec<vk::QueueFamilyProperties>;

    /// Can queue family `family` present to `surface`?
    fn supports_present(
        &self,
        device: vk::PhysicalDevice,
        family: u32,
        surface: vk::SurfaceKHR,
    ) -> Result<bool, vk::Result>;

    fn extensions(&self, device: vk::PhysicalDevice) -> Result<Vec<vk::ExtensionProperties>, vk::Result>;

    fn swapchain_support(
        &self,
        device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> Result<SwapchainSupport, vk::Result>;
}

// A live instance answers queries straight from the driver.
impl DeviceQuery for VulkanInstance {
    fn physical_devices(&self) -> Result<Vec<vk::PhysicalDevice>, vk::Result> {
        unsafe { self.instance.enumerate_physical_devices() }
    }

    fn properties(&self, device: vk::PhysicalDevice) -> vk::PhysicalDeviceProperties {
        unsafe { self.instance.get_physical_device_properties(device) }
    }

    fn features(&self, device: vk::PhysicalDevice) -> vk::PhysicalDeviceFeatures {
        unsafe { self.instance.get_physical_device_features(device) }
    }

    fn queue_families(&self, device: vk::PhysicalDevice) -> Vec<vk::QueueFamilyProperties> {
        unsafe { self.instance.get_physical_device_queue_family_properties(device) }
    }

    fn supports_present(
        &self,
        device: vk::PhysicalDevice,
        family: u32,
        surface: vk::SurfaceKHR,
    ) -> Result<bool, vk::Result> {
        unsafe {
            self.surface_loader
                .get_physical_device_surface_support(device, family, surface)
        }
    }

    fn extensions(&self, device: vk::PhysicalDevice) -> Result<Vec<vk::ExtensionProperties>, vk::Result> {
        unsafe { self.instance.enumerate_device_extension_properties(device) }
    }

    fn swapchain_support(
        &self,
        device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> Result<SwapchainSupport, vk::Result> {
        unsafe {
            Ok(SwapchainSupport {
                capabilities: self
                    .surface_loader
                    .get_physical_device_surface_capabilities(device, surface)?,
                formats: self
                    .surface_loader
                    .get_physical_device_surface_formats(device, surface)?,
                present_modes: self
                    .surface_loader
                    .get_physical_device_surface_present_modes(device, surface)?,
            })
        }
    }
}

/// Read a NUL-terminated name out of one of Vulkan's fixed-size char arrays.
pub fn fixed_name(raw: &[c_char]) -> &CStr {
    let bytes = unsafe { std::slice::from_raw_parts(raw.as_ptr().cast::<u8>(), raw.len()) };
    CStr::from_bytes_until_nul(bytes).unwrap_or_default()
}

pub fn device_name(properties: &vk::PhysicalDeviceProperties) -> String {
    fixed_name(&properties.device_name).to_string_lossy().into_owned()
}
