// Scripted stand-ins for the driver, used by the unit tests.
//
// `FakeQuery` answers capability queries from a list of `FakeGpu`s.
// `FakeDriver` plays the whole bootstrap and records every create and
// destroy into a shared log so tests can check release order.

use ash::vk::{self, Handle};
use std::cell::RefCell;
use std::ffi::{c_char, CStr, CString};
use std::rc::Rc;

use super::bootstrap::{Driver, PresentImages};
use super::error::{BootstrapError, BootstrapResult};
use super::query::DeviceQuery;
use super::queues::ResolvedQueues;
use super::swapchain::{SwapchainConfig, SwapchainSupport, PREFERRED_SURFACE_FORMAT};

pub fn surface() -> vk::SurfaceKHR {
    vk::SurfaceKHR::from_raw(0x5eaf)
}

fn extension(name: &CStr) -> vk::ExtensionProperties {
    let mut props = vk::ExtensionProperties::default();
    for (dst, &src) in props.extension_name.iter_mut().zip(name.to_bytes_with_nul()) {
        *dst = src as c_char;
    }
    props
}

#[derive(Clone)]
pub struct FakeGpu {
    pub properties: vk::PhysicalDeviceProperties,
    pub features: vk::PhysicalDeviceFeatures,
    pub queue_families: Vec<vk::QueueFamilyProperties>,
    pub present_families: Vec<u32>,
    pub extensions: Vec<vk::ExtensionProperties>,
    pub support: SwapchainSupport,
    // Driver errors reported by the matching query.
    pub present_error: Option<vk::Result>,
    pub extensions_error: Option<vk::Result>,
    pub support_error: Option<vk::Result>,
}

impl FakeGpu {
    /// A fully capable device with a single graphics+present family.
    fn new(device_type: vk::PhysicalDeviceType, max_image_dimension: u32) -> Self {
        let mut properties = vk::PhysicalDeviceProperties::default();
        properties.device_type = device_type;
        properties.limits.max_image_dimension2_d = max_image_dimension;

        let features = vk::PhysicalDeviceFeatures {
            geometry_shader: vk::TRUE,
            ..Default::default()
        };

        Self {
            properties,
            features,
            queue_families: vec![vk::QueueFamilyProperties {
                queue_flags: vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE,
                queue_count: 1,
                ..Default::default()
            }],
            present_families: vec![0],
            extensions: vec![extension(ash::khr::swapchain::NAME)],
            support: SwapchainSupport {
                capabilities: vk::SurfaceCapabilitiesKHR {
                    current_extent: vk::Extent2D {
                        width: u32::MAX,
                        height: u32::MAX,
                    },
                    min_image_extent: vk::Extent2D { width: 1, height: 1 },
                    max_image_extent: vk::Extent2D {
                        width: 4096,
                        height: 4096,
                    },
                    min_image_count: 2,
                    max_image_count: 8,
                    current_transform: vk::SurfaceTransformFlagsKHR::IDENTITY,
                    ..Default::default()
                },
                formats: vec![PREFERRED_SURFACE_FORMAT],
                present_modes: vec![vk::PresentModeKHR::FIFO],
            },
            present_error: None,
            extensions_error: None,
            support_error: None,
        }
    }

    pub fn discrete(max_image_dimension: u32) -> Self {
        Self::new(vk::PhysicalDeviceType::DISCRETE_GPU, max_image_dimension)
    }

    pub fn integrated(max_image_dimension: u32) -> Self {
        Self::new(vk::PhysicalDeviceType::INTEGRATED_GPU, max_image_dimension)
    }
}

#[derive(Clone, Default)]
pub struct FakeQuery {
    gpus: Vec<FakeGpu>,
}

impl FakeQuery {
    pub fn new(gpus: Vec<FakeGpu>) -> Self {
        Self { gpus }
    }

    pub fn handle(&self, index: usize) -> vk::PhysicalDevice {
        vk::PhysicalDevice::from_raw(index as u64 + 1)
    }

    fn gpu(&self, device: vk::PhysicalDevice) -> &FakeGpu {
        &self.gpus[device.as_raw() as usize - 1]
    }
}

impl DeviceQuery for FakeQuery {
    fn physical_devices(&self) -> Result<Vec<vk::PhysicalDevice>, vk::Result> {
        Ok((0..self.gpus.len()).map(|i| self.handle(i)).collect())
    }

    fn properties(&self, device: vk::PhysicalDevice) -> vk::PhysicalDeviceProperties {
        self.gpu(device).properties
    }

    fn features(&self, device: vk::PhysicalDevice) -> vk::PhysicalDeviceFeatures {
        self.gpu(device).features
    }

    fn queue_families(&self, device: vk::PhysicalDevice) -> Vec<vk::QueueFamilyProperties> {
        self.gpu(device).queue_families.clone()
    }

    fn supports_present(
        &self,
        device: vk::PhysicalDevice,
        family: u32,
        _surface: vk::SurfaceKHR,
    ) -> Result<bool, vk::Result> {
        let gpu = self.gpu(device);
        match gpu.present_error {
            Some(err) => Err(err),
            None => Ok(gpu.present_families.contains(&family)),
        }
    }

    fn extensions(&self, device: vk::PhysicalDevice) -> Result<Vec<vk::ExtensionProperties>, vk::Result> {
        let gpu = self.gpu(device);
        match gpu.extensions_error {
            Some(err) => Err(err),
            None => Ok(gpu.extensions.clone()),
        }
    }

    fn swapchain_support(
        &self,
        device: vk::PhysicalDevice,
        _surface: vk::SurfaceKHR,
    ) -> Result<SwapchainSupport, vk::Result> {
        let gpu = self.gpu(device);
        match gpu.support_error {
            Some(err) => Err(err),
            None => Ok(gpu.support.clone()),
        }
    }
}

pub type EventLog = Rc<RefCell<Vec<String>>>;

/// Bootstrap step at which `FakeDriver` reports a driver failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Instance,
    Surface,
    Device,
    Swapchain,
    ImageViews,
}

/// Records its own destruction.
pub struct Tracked {
    name: &'static str,
    log: EventLog,
}

impl Tracked {
    fn new(name: &'static str, log: &EventLog) -> Self {
        log.borrow_mut().push(format!("create {}", name));
        Self {
            name,
            log: log.clone(),
        }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.log.borrow_mut().push(format!("destroy {}", self.name));
    }
}

pub struct FakeInstance {
    pub extensions: Vec<String>,
    pub layers: Vec<String>,
    query: FakeQuery,
    _tracked: Tracked,
}

pub struct FakeDevice {
    pub queues: ResolvedQueues,
    pub extensions: Vec<String>,
    pub layers: Vec<String>,
    _tracked: Tracked,
}

pub struct FakeSwapchain {
    pub config: SwapchainConfig,
    images: Vec<vk::Image>,
    views: Vec<vk::ImageView>,
    log: EventLog,
}

impl PresentImages for FakeSwapchain {
    fn images(&self) -> &[vk::Image] {
        &self.images
    }

    fn image_views(&self) -> &[vk::ImageView] {
        &self.views
    }
}

impl Drop for FakeSwapchain {
    fn drop(&mut self) {
        let mut log = self.log.borrow_mut();
        if !self.views.is_empty() {
            log.push("destroy image views".to_string());
        }
        log.push("destroy swapchain".to_string());
    }
}

pub struct FakeDriver {
    pub gpus: Vec<FakeGpu>,
    pub layers: Vec<CString>,
    pub instance_extensions: Vec<CString>,
    pub platform_extensions: Vec<CString>,
    pub drawable: vk::Extent2D,
    pub swapchain_images: usize,
    pub fail_at: Option<FailAt>,
    pub log: EventLog,
}

impl FakeDriver {
    /// One capable GPU, validation layers and every extension available.
    pub fn new() -> Self {
        let names = |list: &[&str]| -> Vec<CString> {
            list.iter().map(|n| CString::new(*n).unwrap()).collect()
        };

        Self {
            gpus: vec![FakeGpu::discrete(16384)],
            layers: names(&["VK_LAYER_KHRONOS_validation"]),
            instance_extensions: names(&["VK_KHR_surface", "VK_KHR_xcb_surface", "VK_EXT_debug_utils"]),
            platform_extensions: names(&["VK_KHR_surface", "VK_KHR_xcb_surface"]),
            drawable: vk::Extent2D {
                width: 800,
                height: 600,
            },
            swapchain_images: 3,
            fail_at: None,
            log: EventLog::default(),
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub fn destroyed(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| e.strip_prefix("destroy ").map(str::to_string))
            .collect()
    }

    fn fails(&self, step: FailAt) -> bool {
        self.fail_at == Some(step)
    }
}

fn lossy(names: &[&CStr]) -> Vec<String> {
    names.iter().map(|n| n.to_string_lossy().into_owned()).collect()
}

impl Driver for FakeDriver {
    type Instance = FakeInstance;
    type DebugHook = Tracked;
    type Surface = Tracked;
    type Device = FakeDevice;
    type Swapchain = FakeSwapchain;

    fn available_layers(&self) -> BootstrapResult<Vec<CString>> {
        Ok(self.layers.clone())
    }

    fn available_instance_extensions(&self) -> BootstrapResult<Vec<CString>> {
        Ok(self.instance_extensions.clone())
    }

    fn required_instance_extensions(&self) -> BootstrapResult<Vec<CString>> {
        Ok(self.platform_extensions.clone())
    }

    fn create_instance(&self, extensions: &[&CStr], layers: &[&CStr]) -> BootstrapResult<Self::Instance> {
        if self.fails(FailAt::Instance) {
            return Err(BootstrapError::InstanceCreation(vk::Result::ERROR_INITIALIZATION_FAILED));
        }
        Ok(FakeInstance {
            extensions: lossy(extensions),
            layers: lossy(layers),
            query: FakeQuery::new(self.gpus.clone()),
            _tracked: Tracked::new("instance", &self.log),
        })
    }

    fn install_debug_hook(&self, _instance: &Self::Instance) -> Option<Self::DebugHook> {
        Some(Tracked::new("debug hook", &self.log))
    }

    fn create_surface(&self, _instance: &Self::Instance) -> BootstrapResult<Self::Surface> {
        if self.fails(FailAt::Surface) {
            return Err(BootstrapError::SurfaceCreation("window lost".to_string()));
        }
        Ok(Tracked::new("surface", &self.log))
    }

    fn surface_handle(_surface: &Self::Surface) -> vk::SurfaceKHR {
        surface()
    }

    fn query<'a>(&self, instance: &'a Self::Instance) -> &'a dyn DeviceQuery {
        &instance.query
    }

    fn drawable_size(&self) -> vk::Extent2D {
        self.drawable
    }

    fn create_device(
        &self,
        _instance: &Self::Instance,
        _physical_device: vk::PhysicalDevice,
        queues: ResolvedQueues,
        extensions: &[&CStr],
        layers: &[&CStr],
    ) -> BootstrapResult<Self::Device> {
        if self.fails(FailAt::Device) {
            return Err(BootstrapError::LogicalDeviceCreation(vk::Result::ERROR_FEATURE_NOT_PRESENT));
        }
        Ok(FakeDevice {
            queues,
            extensions: lossy(extensions),
            layers: lossy(layers),
            _tracked: Tracked::new("device", &self.log),
        })
    }

    fn device_queues(device: &Self::Device) -> (vk::Queue, vk::Queue) {
        (
            vk::Queue::from_raw(0x100 + u64::from(device.queues.graphics)),
            vk::Queue::from_raw(0x100 + u64::from(device.queues.present)),
        )
    }

    fn create_swapchain(
        &self,
        _device: &Self::Device,
        _surface: &Self::Surface,
        config: &SwapchainConfig,
    ) -> BootstrapResult<Self::Swapchain> {
        if self.fails(FailAt::Swapchain) {
            return Err(BootstrapError::SwapchainCreation(vk::Result::ERROR_SURFACE_LOST_KHR));
        }
        self.log.borrow_mut().push("create swapchain".to_string());
        Ok(FakeSwapchain {
            config: *config,
            images: (0..self.swapchain_images)
                .map(|i| vk::Image::from_raw(0x200 + i as u64))
                .collect(),
            views: Vec::new(),
            log: self.log.clone(),
        })
    }

    fn create_image_views(&self, swapchain: &mut Self::Swapchain) -> BootstrapResult<()> {
        for (index, image) in swapchain.images.iter().enumerate() {
            if self.fails(FailAt::ImageViews) && index == 1 {
                return Err(BootstrapError::ImageViewCreation {
                    index,
                    result: vk::Result::ERROR_OUT_OF_DEVICE_MEMORY,
                });
            }
            swapchain.views.push(vk::ImageView::from_raw(image.as_raw() + 0x100));
        }
        Ok(())
    }
}
