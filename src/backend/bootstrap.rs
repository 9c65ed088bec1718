// GPU bring-up sequence
//
// instance -> debug hook -> surface -> device selection -> logical device
// -> swapchain -> image views
//
// Each step is a precondition for the next and any failure aborts the whole
// sequence. Every handle is an owned value, so an early return drops what
// was already created in reverse order.

use ash::vk;
use std::ffi::{CStr, CString};

use super::error::{BootstrapResult, FailureKind};
use super::instance::{self, VALIDATION_LAYERS};
use super::query::DeviceQuery;
use super::queues::ResolvedQueues;
use super::selector::{self, DEVICE_EXTENSIONS};
use super::swapchain::{self, SwapchainConfig};

/// Access to a swapchain's images and their views.
pub trait PresentImages {
    fn images(&self) -> &[vk::Image];
    fn image_views(&self) -> &[vk::ImageView];
}

/// The platform and driver calls the bootstrap sequence is built from.
///
/// Associated handle types release themselves when dropped.
pub trait Driver {
    type Instance;
    type DebugHook;
    type Surface;
    type Device;
    type Swapchain: PresentImages;

    fn available_layers(&self) -> BootstrapResult<Vec<CString>>;

    fn available_instance_extensions(&self) -> BootstrapResult<Vec<CString>>;

    /// Surface extensions the windowing platform requires.
    fn required_instance_extensions(&self) -> BootstrapResult<Vec<CString>>;

    fn create_instance(&self, extensions: &[&CStr], layers: &[&CStr]) -> BootstrapResult<Self::Instance>;

    /// Never fails the sequence; `None` means diagnostics stay silent.
    fn install_debug_hook(&self, instance: &Self::Instance) -> Option<Self::DebugHook>;

    fn create_surface(&self, instance: &Self::Instance) -> BootstrapResult<Self::Surface>;

    fn surface_handle(surface: &Self::Surface) -> vk::SurfaceKHR;

    fn query<'a>(&self, instance: &'a Self::Instance) -> &'a dyn DeviceQuery;

    /// Current drawable size of the window in pixels.
    fn drawable_size(&self) -> vk::Extent2D;

    fn create_device(
        &self,
        instance: &Self::Instance,
        physical_device: vk::PhysicalDevice,
        queues: ResolvedQueues,
        extensions: &[&CStr],
        layers: &[&CStr],
    ) -> BootstrapResult<Self::Device>;

    /// (graphics, present)
    fn device_queues(device: &Self::Device) -> (vk::Queue, vk::Queue);

    fn create_swapchain(
        &self,
        device: &Self::Device,
        surface: &Self::Surface,
        config: &SwapchainConfig,
    ) -> BootstrapResult<Self::Swapchain>;

    fn create_image_views(&self, swapchain: &mut Self::Swapchain) -> BootstrapResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    Uninitialized,
    InstanceCreated,
    DebugHooked,
    SurfaceCreated,
    DeviceChosen,
    LogicalDeviceCreated,
    SwapchainCreated,
    Ready,
    Failed(FailureKind),
}

/// Everything rendering needs once bring-up succeeded.
///
/// Fields drop top to bottom: swapchain (with its views), device, surface,
/// debug hook, instance.
pub struct RenderContext<D: Driver> {
    pub swapchain: D::Swapchain,
    pub device: D::Device,
    pub surface: D::Surface,
    pub debug_hook: Option<D::DebugHook>,
    pub instance: D::Instance,

    pub physical_device: vk::PhysicalDevice,
    pub queues: ResolvedQueues,
    pub graphics_queue: vk::Queue,
    pub present_queue: vk::Queue,
    pub config: SwapchainConfig,
}

impl<D: Driver> RenderContext<D> {
    pub fn swapchain_format(&self) -> vk::Format {
        self.config.format.format
    }

    pub fn swapchain_extent(&self) -> vk::Extent2D {
        self.config.extent
    }

    pub fn images(&self) -> &[vk::Image] {
        self.swapchain.images()
    }

    pub fn image_views(&self) -> &[vk::ImageView] {
        self.swapchain.image_views()
    }
}

pub struct Bootstrap<'d, D: Driver> {
    driver: &'d D,
    diagnostics: bool,
    state: BootstrapState,
    // Every state entered, starting with Uninitialized.
    history: Vec<BootstrapState>,
}

impl<'d, D: Driver> Bootstrap<'d, D> {
    /// `diagnostics` enables validation layers and the debug hook.
    pub fn new(driver: &'d D, diagnostics: bool) -> Self {
        Self {
            driver,
            diagnostics,
            state: BootstrapState::Uninitialized,
            history: vec![BootstrapState::Uninitialized],
        }
    }

    pub fn state(&self) -> BootstrapState {
        self.state
    }

    /// States entered so far, in order.
    pub fn history(&self) -> &[BootstrapState] {
        &self.history
    }

    pub fn run(&mut self) -> BootstrapResult<RenderContext<D>> {
        match self.execute() {
            Ok(context) => {
                self.advance(BootstrapState::Ready);
                Ok(context)
            }
            Err(err) => {
                log::error!(target: "renderer", "Bootstrap failed after {:?}: {}", self.state, err);
                self.advance(BootstrapState::Failed(err.kind()));
                Err(err)
            }
        }
    }

    fn advance(&mut self, next: BootstrapState) {
        log::debug!(target: "renderer", "Bootstrap: {:?} -> {:?}", self.state, next);
        self.state = next;
        self.history.push(next);
    }

    fn execute(&mut self) -> BootstrapResult<RenderContext<D>> {
        let driver = self.driver;

        // Layers and extensions are checked before anything is created.
        let layers: &[&CStr] = if self.diagnostics {
            instance::check_validation_layers(&driver.available_layers()?)?;
            VALIDATION_LAYERS
        } else {
            &[]
        };

        let platform_extensions = driver.required_instance_extensions()?;
        let mut extensions: Vec<&CStr> = platform_extensions.iter().map(CString::as_c_str).collect();
        if self.diagnostics {
            extensions.push(ash::ext::debug_utils::NAME);
        }

        let available = driver.available_instance_extensions()?;
        for ext in &available {
            log::debug!(target: "renderer", "Vulkan - Available extension: {}", ext.to_string_lossy());
        }
        instance::check_extensions(&extensions, &available)?;

        let instance = driver.create_instance(&extensions, layers)?;
        self.advance(BootstrapState::InstanceCreated);

        let debug_hook = if self.diagnostics {
            let hook = driver.install_debug_hook(&instance);
            self.advance(BootstrapState::DebugHooked);
            hook
        } else {
            None
        };

        let surface = driver.create_surface(&instance)?;
        let surface_handle = D::surface_handle(&surface);
        self.advance(BootstrapState::SurfaceCreated);

        let query = driver.query(&instance);
        let (physical_device, queues) = selector::pick(query, surface_handle)?;
        self.advance(BootstrapState::DeviceChosen);

        let device = driver.create_device(&instance, physical_device, queues, DEVICE_EXTENSIONS, layers)?;
        let (graphics_queue, present_queue) = D::device_queues(&device);
        self.advance(BootstrapState::LogicalDeviceCreated);

        let config = swapchain::negotiate_for(
            query,
            physical_device,
            surface_handle,
            queues,
            driver.drawable_size(),
        )?;
        let mut swapchain = driver.create_swapchain(&device, &surface, &config)?;
        driver.create_image_views(&mut swapchain)?;
        self.advance(BootstrapState::SwapchainCreated);

        Ok(RenderContext {
            swapchain,
            device,
            surface,
            debug_hook,
            instance,
            physical_device,
            queues,
            graphics_queue,
            present_queue,
            config,
        })
    }
}

/// Run the whole bring-up sequence.
pub fn bootstrap<D: Driver>(driver: &D, diagnostics: bool) -> BootstrapResult<RenderContext<D>> {
    Bootstrap::new(driver, diagnostics).run()
}
