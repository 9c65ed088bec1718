// Physical device selection
//
// Every GPU the instance exposes is scored; the highest score wins. A score
// of zero means the device is disqualified, not that it is merely slow.

use ash::vk;
use std::ffi::CStr;

use super::error::{BootstrapError, BootstrapResult};
use super::query::{self, DeviceQuery};
use super::queues::{self, ResolvedQueues};

/// Device extensions the renderer cannot run without.
pub const DEVICE_EXTENSIONS: &[&CStr] = &[ash::khr::swapchain::NAME];

/// Added once for dedicated hardware.
pub const DISCRETE_GPU_BONUS: u64 = 1000;

/// Features every selected device must support, also enabled on the
/// logical device.
pub const REQUIRED_DEVICE_FEATURES: vk::PhysicalDeviceFeatures = vk::PhysicalDeviceFeatures {
    geometry_shader: vk::TRUE,
    ..unsafe { std::mem::zeroed() }
};

fn check_device_features(features: &vk::PhysicalDeviceFeatures) -> bool {
    features.geometry_shader == vk::TRUE
}

/// Does `device` offer every extension in `DEVICE_EXTENSIONS`?
pub fn supports_extensions(query: &dyn DeviceQuery, device: vk::PhysicalDevice) -> BootstrapResult<bool> {
    let available = query
        .extensions(device)
        .map_err(BootstrapError::DeviceQuery)?;

    Ok(DEVICE_EXTENSIONS.iter().all(|required| {
        available
            .iter()
            .any(|ext| query::fixed_name(&ext.extension_name) == *required)
    }))
}

/// Queue coverage, extension support and a presentable surface.
pub fn is_suitable(
    query: &dyn DeviceQuery,
    device: vk::PhysicalDevice,
    surface: vk::SurfaceKHR,
) -> BootstrapResult<bool> {
    if !queues::resolve(query, device, surface)?.is_complete() {
        return Ok(false);
    }

    if !supports_extensions(query, device)? {
        return Ok(false);
    }

    let support = query
        .swapchain_support(device, surface)
        .map_err(BootstrapError::SwapchainSupport)?;
    Ok(support.is_adequate())
}

/// Score a candidate. Zero disqualifies; driver errors abort.
pub fn score(
    query: &dyn DeviceQuery,
    device: vk::PhysicalDevice,
    surface: vk::SurfaceKHR,
) -> BootstrapResult<u64> {
    let properties = query.properties(device);
    let features = query.features(device);

    log::debug!(target: "renderer", "Rating physical device: {}", query::device_name(&properties));

    let mut score = 0;

    // Favor dedicated gpus
    if properties.device_type == vk::PhysicalDeviceType::DISCRETE_GPU {
        score += DISCRETE_GPU_BONUS;
    }

    log::debug!(target: "renderer", "MaxImageDimension2D: {}", properties.limits.max_image_dimension2_d);
    score += u64::from(properties.limits.max_image_dimension2_d);

    if !check_device_features(&features) {
        return Ok(0);
    }

    if !is_suitable(query, device, surface)? {
        return Ok(0);
    }

    log::debug!(target: "renderer", "Score: {}", score);
    Ok(score)
}

/// Pick the best-scoring device and its queue families.
///
/// Among equal top scores the last one enumerated wins.
pub fn pick(
    query: &dyn DeviceQuery,
    surface: vk::SurfaceKHR,
) -> BootstrapResult<(vk::PhysicalDevice, ResolvedQueues)> {
    log::debug!(target: "renderer", "Picking a physical device");

    let devices = query
        .physical_devices()
        .map_err(BootstrapError::DeviceEnumeration)?;

    let mut best: Option<(vk::PhysicalDevice, u64)> = None;
    for &device in &devices {
        let score = score(query, device, surface)?;
        if score > 0 && best.map_or(true, |(_, best_score)| score >= best_score) {
            best = Some((device, score));
        }
    }

    let no_device = || BootstrapError::NoSuitableDevice {
        candidates: devices.len(),
    };
    let (device, _) = best.ok_or_else(no_device)?;

    // Scoring already required complete queues; resolve again for the indices.
    let queues = queues::resolve(query, device, surface)?
        .resolved()
        .ok_or_else(no_device)?;

    let properties = query.properties(device);
    log::info!(target: "renderer", "Selected GPU: {}", query::device_name(&properties));
    log::info!(
        target: "renderer",
        "Device type: {:?}, API Version: {}.{}.{}",
        properties.device_type,
        vk::api_version_major(properties.api_version),
        vk::api_version_minor(properties.api_version),
        vk::api_version_patch(properties.api_version)
    );

    Ok((device, queues))
}
