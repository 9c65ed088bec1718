// Queue family resolution
//
// A device is only usable if it has a family that accepts graphics work and
// a family that can present to our surface. They may be the same family.

use ash::vk;

use super::error::{BootstrapError, BootstrapResult};
use super::query::DeviceQuery;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    pub graphics: Option<u32>,
    pub present: Option<u32>,
}

impl QueueFamilyIndices {
    pub fn is_complete(&self) -> bool {
        self.graphics.is_some() && self.present.is_some()
    }

    /// Both indices, if the search found both.
    pub fn resolved(&self) -> Option<ResolvedQueues> {
        Some(ResolvedQueues {
            graphics: self.graphics?,
            present: self.present?,
        })
    }
}

/// Queue family indices of a device that passed resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedQueues {
    pub graphics: u32,
    pub present: u32,
}

impl ResolvedQueues {
    /// Distinct families, one queue is requested from each.
    pub fn unique_families(&self) -> Vec<u32> {
        if self.graphics == self.present {
            vec![self.graphics]
        } else {
            vec![self.graphics, self.present]
        }
    }

    pub fn sharing(&self) -> ImageSharing {
        if self.graphics == self.present {
            ImageSharing::Exclusive
        } else {
            ImageSharing::Concurrent([self.graphics, self.present])
        }
    }
}

/// How swapchain images are shared between queue families.
///
/// Images touched by two different families must be concurrent; exclusive
/// ownership across families without transfers is undefined behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSharing {
    Exclusive,
    Concurrent([u32; 2]),
}

impl ImageSharing {
    pub fn mode(&self) -> vk::SharingMode {
        match self {
            Self::Exclusive => vk::SharingMode::EXCLUSIVE,
            Self::Concurrent(_) => vk::SharingMode::CONCURRENT,
        }
    }

    pub fn family_indices(&self) -> &[u32] {
        match self {
            Self::Exclusive => &[],
            Self::Concurrent(families) => families,
        }
    }
}

/// Find graphics and present families on `device` for `surface`.
pub fn resolve(
    query: &dyn DeviceQuery,
    device: vk::PhysicalDevice,
    surface: vk::SurfaceKHR,
) -> BootstrapResult<QueueFamilyIndices> {
    let families = query.queue_families(device);
    resolve_families(&families, |index| {
        query
            .supports_present(device, index, surface)
            .map_err(BootstrapError::DeviceQuery)
    })
}

/// Scan `families` in index order, keeping the first match for each role.
/// The first error from `can_present` aborts the scan.
pub fn resolve_families(
    families: &[vk::QueueFamilyProperties],
    mut can_present: impl FnMut(u32) -> BootstrapResult<bool>,
) -> BootstrapResult<QueueFamilyIndices> {
    let mut indices = QueueFamilyIndices::default();

    for (index, family) in (0u32..).zip(families) {
        if family.queue_count == 0 {
            continue;
        }

        if indices.graphics.is_none() && family.queue_flags.contains(vk::QueueFlags::GRAPHICS) {
            indices.graphics = Some(index);
        }

        if indices.present.is_none() && can_present(index)? {
            indices.present = Some(index);
        }

        if indices.is_complete() {
            break;
        }
    }

    Ok(indices)
}
