//! Physical device selection.

use std::ffi::CStr;

use ash::vk;
use tracing::{debug, info};

use crate::error::{RhiError, RhiResult};
use crate::swapchain::SwapchainSupportDetails;

/// Queue family indices the renderer needs.
///
/// Graphics and present are usually the same family; they are tracked
/// separately because Vulkan does not guarantee it.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueueFamilyIndices {
    pub graphics: Option<u32>,
    pub present: Option<u32>,
}

impl QueueFamilyIndices {
    /// True when every required family was found.
    pub fn is_complete(&self) -> bool {
        self.graphics.is_some() && self.present.is_some()
    }

    /// Deduplicated family indices, for queue create infos.
    pub fn unique_families(&self) -> Vec<u32> {
        let mut families = Vec::with_capacity(2);
        if let Some(graphics) = self.graphics {
            families.push(graphics);
        }
        if let Some(present) = self.present {
            if !families.contains(&present) {
                families.push(present);
            }
        }
        families
    }
}

/// Finds graphics and present queue families on `device`.
pub fn find_queue_families(
    instance: &ash::Instance,
    surface_loader: &ash::khr::surface::Instance,
    device: vk::PhysicalDevice,
    surface: vk::SurfaceKHR,
) -> RhiResult<QueueFamilyIndices> {
    let families = unsafe { instance.get_physical_device_queue_family_properties(device) };

    let mut indices = QueueFamilyIndices::default();
    for (index, family) in families.iter().enumerate() {
        let index = index as u32;

        if indices.graphics.is_none()
            && family.queue_flags.contains(vk::QueueFlags::GRAPHICS)
        {
            indices.graphics = Some(index);
        }

        if indices.present.is_none() {
            let supported = unsafe {
                surface_loader.get_physical_device_surface_support(device, index, surface)?
            };
            if supported {
                indices.present = Some(index);
            }
        }

        if indices.is_complete() {
            break;
        }
    }

    Ok(indices)
}

/// Device extensions the renderer requires.
pub const REQUIRED_DEVICE_EXTENSIONS: &[&CStr] = &[ash::khr::swapchain::NAME];

fn supports_required_extensions(
    instance: &ash::Instance,
    device: vk::PhysicalDevice,
) -> RhiResult<bool> {
    let available = unsafe { instance.enumerate_device_extension_properties(device)? };

    for required in REQUIRED_DEVICE_EXTENSIONS {
        let found = available.iter().any(|ext| {
            let name = unsafe { CStr::from_ptr(ext.extension_name.as_ptr()) };
            name == *required
        });
        if !found {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Ranks a device so discrete GPUs win over integrated ones.
fn device_score(properties: &vk::PhysicalDeviceProperties) -> u32 {
    match properties.device_type {
        vk::PhysicalDeviceType::DISCRETE_GPU => 3,
        vk::PhysicalDeviceType::INTEGRATED_GPU => 2,
        vk::PhysicalDeviceType::VIRTUAL_GPU => 1,
        _ => 0,
    }
}

/// Picks the best physical device that can render to `surface`.
///
/// A device qualifies when it has graphics and present queue families,
/// supports the swapchain extension, and offers at least one surface
/// format and present mode.
///
/// # Errors
///
/// Returns [`RhiError::NoSuitableGpu`] when nothing qualifies.
pub fn select_physical_device(
    instance: &ash::Instance,
    surface_loader: &ash::khr::surface::Instance,
    surface: vk::SurfaceKHR,
) -> RhiResult<(vk::PhysicalDevice, QueueFamilyIndices)> {
    let devices = unsafe { instance.enumerate_physical_devices()? };
    if devices.is_empty() {
        return Err(RhiError::NoSuitableGpu);
    }

    let mut best: Option<(u32, vk::PhysicalDevice, QueueFamilyIndices)> = None;

    for device in devices {
        let properties = unsafe { instance.get_physical_device_properties(device) };
        let name = unsafe { CStr::from_ptr(properties.device_name.as_ptr()) };

        let indices = find_queue_families(instance, surface_loader, device, surface)?;
        if !indices.is_complete() {
            debug!("{}: missing required queue families", name.to_string_lossy());
            continue;
        }

        if !supports_required_extensions(instance, device)? {
            debug!("{}: missing swapchain extension", name.to_string_lossy());
            continue;
        }

        let support = SwapchainSupportDetails::query(surface_loader, device, surface)?;
        if !support.is_adequate() {
            debug!("{}: inadequate surface support", name.to_string_lossy());
            continue;
        }

        let score = device_score(&properties);
        let better = match &best {
            Some((best_score, _, _)) => score > *best_score,
            None => true,
        };
        if better {
            info!(
                "candidate GPU: {} ({:?})",
                name.to_string_lossy(),
                properties.device_type
            );
            best = Some((score, device, indices));
        }
    }

    best.map(|(_, device, indices)| (device, indices))
        .ok_or(RhiError::NoSuitableGpu)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_indices() {
        let indices = QueueFamilyIndices::default();
        assert!(!indices.is_complete());

        let indices = QueueFamilyIndices {
            graphics: Some(0),
            present: None,
        };
        assert!(!indices.is_complete());
    }

    #[test]
    fn unique_families_deduplicates_shared_family() {
        let indices = QueueFamilyIndices {
            graphics: Some(0),
            present: Some(0),
        };
        assert_eq!(indices.unique_families(), vec![0]);
    }

    #[test]
    fn unique_families_keeps_distinct_families() {
        let indices = QueueFamilyIndices {
            graphics: Some(0),
            present: Some(2),
        };
        assert_eq!(indices.unique_families(), vec![0, 2]);
    }

    #[test]
    fn discrete_gpu_outranks_integrated() {
        let discrete = vk::PhysicalDeviceProperties {
            device_type: vk::PhysicalDeviceType::DISCRETE_GPU,
            ..Default::default()
        };
        let integrated = vk::PhysicalDeviceProperties {
            device_type: vk::PhysicalDeviceType::INTEGRATED_GPU,
            ..Default::default()
        };
        assert!(device_score(&discrete) > device_score(&integrated));
    }
}
