// Bootstrap errors
//
// Every failure during GPU bring-up is fatal. The variants name the step
// that failed so the log line alone tells you where bootstrap stopped.

use ash::vk;
use thiserror::Error;

/// Coarse classification of a bootstrap failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Required layers or extensions are missing. Nothing was created yet.
    Availability,
    /// Hardware is present but none of it qualifies.
    Capability,
    /// The driver rejected a create call.
    ResourceCreation,
}

#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Failed to load Vulkan library: {0}")]
    LoaderUnavailable(String),

    #[error("Failed to enumerate instance layers: {0}")]
    LayerEnumeration(vk::Result),

    #[error("Failed to enumerate instance extensions: {0}")]
    ExtensionEnumeration(vk::Result),

    #[error("Validation layers requested, but not available: {missing:?}")]
    ValidationLayersUnavailable { missing: Vec<String> },

    #[error("Required instance extensions not available: {missing:?}")]
    ExtensionsUnavailable { missing: Vec<String> },

    #[error("Failed to create Vulkan instance: {0}")]
    InstanceCreation(vk::Result),

    #[error("Failed to create a surface to draw on: {0}")]
    SurfaceCreation(String),

    #[error("Failed to enumerate physical devices: {0}")]
    DeviceEnumeration(vk::Result),

    #[error("Failed to query physical device: {0}")]
    DeviceQuery(vk::Result),

    #[error("No suitable GPU found among {candidates} devices")]
    NoSuitableDevice { candidates: usize },

    #[error("Failed to create logical device: {0}")]
    LogicalDeviceCreation(vk::Result),

    #[error("Failed to query swapchain support: {0}")]
    SwapchainSupport(vk::Result),

    #[error("Surface reports no formats")]
    NoSurfaceFormat,

    #[error("Failed to create swapchain: {0}")]
    SwapchainCreation(vk::Result),

    #[error("Failed to create image view {index}: {result}")]
    ImageViewCreation { index: usize, result: vk::Result },
}

impl BootstrapError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::LoaderUnavailable(_)
            | Self::LayerEnumeration(_)
            | Self::ExtensionEnumeration(_)
            | Self::ValidationLayersUnavailable { .. }
            | Self::ExtensionsUnavailable { .. } => FailureKind::Availability,
            Self::NoSuitableDevice { .. } | Self::NoSurfaceFormat => FailureKind::Capability,
            Self::InstanceCreation(_)
            | Self::SurfaceCreation(_)
            | Self::DeviceEnumeration(_)
            | Self::DeviceQuery(_)
            | Self::LogicalDeviceCreation(_)
            | Self::SwapchainSupport(_)
            | Self::SwapchainCreation(_)
            | Self::ImageViewCreation { .. } => FailureKind::ResourceCreation,
        }
    }
}

pub type BootstrapResult<T> = std::result::Result<T, BootstrapError>;
