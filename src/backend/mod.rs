// Backend module - Vulkan bring-up
//
// Design: Thin wrapper around ash with safety and ergonomics. Selection and
// negotiation logic is plain functions over queried data; the driver calls
// sit behind `Driver` and `DeviceQuery`.

pub mod bootstrap;
pub mod device;
pub mod error;
pub mod instance;
pub mod query;
pub mod queues;
pub mod selector;
pub mod surface;
pub mod swapchain;
pub mod vulkan;

#[cfg(test)]
pub(crate) mod testing;

pub use bootstrap::{bootstrap, Bootstrap, BootstrapState, Driver, PresentImages, RenderContext};
pub use device::VulkanDevice;
pub use error::{BootstrapError, BootstrapResult, FailureKind};
pub use instance::VulkanInstance;
pub use queues::{ImageSharing, QueueFamilyIndices, ResolvedQueues};
pub use swapchain::{Swapchain, SwapchainConfig, SwapchainSupport};
pub use vulkan::VulkanDriver;
