// Swapchain - Window presentation
//
// Negotiates a concrete swapchain configuration from what the surface
// supports, then creates the chain of images we present to the screen and
// one view per image.

use ash::vk;
use std::sync::Arc;

use super::error::{BootstrapError, BootstrapResult};
use super::query::DeviceQuery;
use super::queues::{ImageSharing, ResolvedQueues};
use super::VulkanDevice;

/// 8-bit BGRA in the sRGB nonlinear color space.
pub const PREFERRED_SURFACE_FORMAT: vk::SurfaceFormatKHR = vk::SurfaceFormatKHR {
    format: vk::Format::B8G8R8A8_SRGB,
    color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
};

/// Everything the surface reports for one (device, surface) pair.
#[derive(Debug, Clone, Default)]
pub struct SwapchainSupport {
    pub capabilities: vk::SurfaceCapabilitiesKHR,
    pub formats: Vec<vk::SurfaceFormatKHR>,
    pub present_modes: Vec<vk::PresentModeKHR>,
}

impl SwapchainSupport {
    /// A pair can present only if it offers at least one format and one mode.
    pub fn is_adequate(&self) -> bool {
        !self.formats.is_empty() && !self.present_modes.is_empty()
    }
}

/// The resolved parameters a swapchain is created with.
#[derive(Debug, Clone, Copy)]
pub struct SwapchainConfig {
    pub format: vk::SurfaceFormatKHR,
    pub present_mode: vk::PresentModeKHR,
    pub extent: vk::Extent2D,
    pub image_count: u32,
    pub sharing: ImageSharing,
    pub pre_transform: vk::SurfaceTransformFlagsKHR,
}

/// Prefer sRGB BGRA, otherwise take whatever the surface lists first.
pub fn choose_surface_format(formats: &[vk::SurfaceFormatKHR]) -> Option<vk::SurfaceFormatKHR> {
    formats
        .iter()
        .find(|f| {
            f.format == PREFERRED_SURFACE_FORMAT.format
                && f.color_space == PREFERRED_SURFACE_FORMAT.color_space
        })
        .or_else(|| formats.first())
        .copied()
}

// MAILBOX: No vsync, no tearing, triple buffered
// FIFO: Vsync enabled, guaranteed available
pub fn choose_present_mode(modes: &[vk::PresentModeKHR]) -> vk::PresentModeKHR {
    modes
        .iter()
        .copied()
        .find(|&mode| mode == vk::PresentModeKHR::MAILBOX)
        .unwrap_or(vk::PresentModeKHR::FIFO)
}

/// A current extent of `u32::MAX` means the surface lets us pick; in that
/// case the drawable size is clamped into the supported range.
pub fn choose_extent(caps: &vk::SurfaceCapabilitiesKHR, drawable: vk::Extent2D) -> vk::Extent2D {
    if caps.current_extent.width != u32::MAX {
        return caps.current_extent;
    }

    // Not `clamp`: a driver may report min > max.
    vk::Extent2D {
        width: drawable
            .width
            .min(caps.max_image_extent.width)
            .max(caps.min_image_extent.width),
        height: drawable
            .height
            .min(caps.max_image_extent.height)
            .max(caps.min_image_extent.height),
    }
}

/// One image above the minimum, capped by the maximum (0 means no cap).
pub fn choose_image_count(caps: &vk::SurfaceCapabilitiesKHR) -> u32 {
    let image_count = caps.min_image_count + 1;
    if caps.max_image_count > 0 && image_count > caps.max_image_count {
        caps.max_image_count
    } else {
        image_count
    }
}

pub fn negotiate(
    support: &SwapchainSupport,
    queues: ResolvedQueues,
    drawable: vk::Extent2D,
) -> BootstrapResult<SwapchainConfig> {
    let format = choose_surface_format(&support.formats).ok_or(BootstrapError::NoSurfaceFormat)?;
    let caps = &support.capabilities;

    Ok(SwapchainConfig {
        format,
        present_mode: choose_present_mode(&support.present_modes),
        extent: choose_extent(caps, drawable),
        image_count: choose_image_count(caps),
        sharing: queues.sharing(),
        pre_transform: caps.current_transform,
    })
}

/// Query the surface for `device` and negotiate against it.
pub fn negotiate_for(
    query: &dyn DeviceQuery,
    device: vk::PhysicalDevice,
    surface: vk::SurfaceKHR,
    queues: ResolvedQueues,
    drawable: vk::Extent2D,
) -> BootstrapResult<SwapchainConfig> {
    let support = query
        .swapchain_support(device, surface)
        .map_err(BootstrapError::SwapchainSupport)?;
    let config = negotiate(&support, queues, drawable)?;

    log::debug!(
        target: "renderer",
        "Swapchain config: {:?} {:?}, {:?}, {}x{}, {} images, {:?} sharing",
        config.format.format,
        config.format.color_space,
        config.present_mode,
        config.extent.width,
        config.extent.height,
        config.image_count,
        config.sharing.mode(),
    );

    Ok(config)
}

/// A 2D color view over the whole of one swapchain image.
pub fn image_view_info(image: vk::Image, format: vk::Format) -> vk::ImageViewCreateInfo<'static> {
    vk::ImageViewCreateInfo::default()
        .image(image)
        .view_type(vk::ImageViewType::TYPE_2D)
        .format(format)
        .components(vk::ComponentMapping {
            r: vk::ComponentSwizzle::IDENTITY,
            g: vk::ComponentSwizzle::IDENTITY,
            b: vk::ComponentSwizzle::IDENTITY,
            a: vk::ComponentSwizzle::IDENTITY,
        })
        .subresource_range(vk::ImageSubresourceRange {
            aspect_mask: vk::ImageAspectFlags::COLOR,
            base_mip_level: 0,
            level_count: 1,
            base_array_layer: 0,
            layer_count: 1,
        })
}

pub struct Swapchain {
    pub swapchain: vk::SwapchainKHR,
    pub swapchain_loader: ash::khr::swapchain::Device,
    pub images: Vec<vk::Image>,
    pub image_views: Vec<vk::ImageView>,
    pub format: vk::Format,
    pub extent: vk::Extent2D,
    device: Arc<VulkanDevice>,
}

impl Swapchain {
    /// Create the swapchain and fetch its images. Views come later, from
    /// `create_image_views`.
    pub fn new(
        device: Arc<VulkanDevice>,
        surface: vk::SurfaceKHR,
        config: &SwapchainConfig,
    ) -> BootstrapResult<Self> {
        log::info!(
            target: "renderer",
            "Creating swapchain: {}x{}",
            config.extent.width,
            config.extent.height
        );

        let swapchain_loader =
            ash::khr::swapchain::Device::new(&device.instance.instance, &device.device);

        let create_info = vk::SwapchainCreateInfoKHR::default()
            .surface(surface)
            .min_image_count(config.image_count)
            .image_format(config.format.format)
            .image_color_space(config.format.color_space)
            .image_extent(config.extent)
            .image_array_layers(1)
            .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
            .image_sharing_mode(config.sharing.mode())
            .queue_family_indices(config.sharing.family_indices())
            .pre_transform(config.pre_transform)
            .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
            .present_mode(config.present_mode)
            .clipped(true);

        let swapchain = unsafe { swapchain_loader.create_swapchain(&create_info, None) }
            .map_err(BootstrapError::SwapchainCreation)?;

        let mut this = Self {
            swapchain,
            swapchain_loader,
            images: Vec::new(),
            image_views: Vec::new(),
            format: config.format.format,
            extent: config.extent,
            device,
        };

        // From here on `this` owns the handle, so an error below still
        // destroys the swapchain.
        this.images = unsafe { this.swapchain_loader.get_swapchain_images(this.swapchain) }
            .map_err(BootstrapError::SwapchainCreation)?;

        log::info!(target: "renderer", "Created swapchain with {} images", this.images.len());

        Ok(this)
    }

    /// Create exactly one view per swapchain image.
    pub fn create_image_views(&mut self) -> BootstrapResult<()> {
        log::debug!(target: "renderer", "Creating image views");

        for (index, &image) in self.images.iter().enumerate().skip(self.image_views.len()) {
            let create_info = image_view_info(image, self.format);
            let view = unsafe { self.device.device.create_image_view(&create_info, None) }
                .map_err(|result| BootstrapError::ImageViewCreation { index, result })?;
            self.image_views.push(view);
        }

        log::debug!(target: "renderer", "Created {} image views", self.image_views.len());
        Ok(())
    }
}

impl Drop for Swapchain {
    fn drop(&mut self) {
        unsafe {
            for &view in &self.image_views {
                self.device.device.destroy_image_view(view, None);
            }
            self.swapchain_loader.destroy_swapchain(self.swapchain, None);
        }
    }
}
