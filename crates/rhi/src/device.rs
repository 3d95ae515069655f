//! Logical device and queues.

use std::mem::ManuallyDrop;
use std::sync::Mutex;

use ash::vk;
use gpu_allocator::vulkan::{Allocator, AllocatorCreateDesc};
use tracing::{info, warn};

use crate::error::{RhiError, RhiResult};
use crate::instance::Instance;
use crate::physical_device::{
    QueueFamilyIndices, REQUIRED_DEVICE_EXTENSIONS, select_physical_device,
};

/// Logical device, queues, and the GPU memory allocator.
///
/// Shared across the RHI as `Arc<Device>`; every resource wrapper holds a
/// clone so the device outlives everything created from it. Dropping the
/// device waits for it to go idle first.
pub struct Device {
    device: ash::Device,
    physical_device: vk::PhysicalDevice,
    queue_families: QueueFamilyIndices,
    graphics_queue: vk::Queue,
    present_queue: vk::Queue,
    // Dropped explicitly before the device handle.
    allocator: ManuallyDrop<Mutex<Allocator>>,
}

impl Device {
    /// Selects a physical device for `surface` and creates the logical
    /// device with graphics and present queues plus the allocator.
    pub fn new(
        instance: &Instance,
        surface_loader: &ash::khr::surface::Instance,
        surface: vk::SurfaceKHR,
    ) -> RhiResult<Self> {
        let (physical_device, queue_families) =
            select_physical_device(instance.handle(), surface_loader, surface)?;

        let queue_priority = [1.0f32];
        let queue_infos: Vec<vk::DeviceQueueCreateInfo> = queue_families
            .unique_families()
            .into_iter()
            .map(|family| {
                vk::DeviceQueueCreateInfo::default()
                    .queue_family_index(family)
                    .queue_priorities(&queue_priority)
            })
            .collect();

        let extension_names: Vec<*const std::ffi::c_char> = REQUIRED_DEVICE_EXTENSIONS
            .iter()
            .map(|ext| ext.as_ptr())
            .collect();

        let features = vk::PhysicalDeviceFeatures::default();

        let create_info = vk::DeviceCreateInfo::default()
            .queue_create_infos(&queue_infos)
            .enabled_extension_names(&extension_names)
            .enabled_features(&features);

        let device = unsafe {
            instance
                .handle()
                .create_device(physical_device, &create_info, None)?
        };

        // Selection only returns complete indices, so these cannot fail.
        let graphics_family = queue_families.graphics.ok_or(RhiError::NoSuitableGpu)?;
        let present_family = queue_families.present.ok_or(RhiError::NoSuitableGpu)?;

        let graphics_queue = unsafe { device.get_device_queue(graphics_family, 0) };
        let present_queue = unsafe { device.get_device_queue(present_family, 0) };

        let allocator = Allocator::new(&AllocatorCreateDesc {
            instance: instance.handle().clone(),
            device: device.clone(),
            physical_device,
            debug_settings: Default::default(),
            buffer_device_address: false,
            allocation_sizes: Default::default(),
        })?;

        info!(
            "logical device created (graphics family {}, present family {})",
            graphics_family, present_family
        );

        Ok(Self {
            device,
            physical_device,
            queue_families,
            graphics_queue,
            present_queue,
            allocator: ManuallyDrop::new(Mutex::new(allocator)),
        })
    }

    /// The raw logical device.
    #[inline]
    pub fn handle(&self) -> &ash::Device {
        &self.device
    }

    /// The physical device this logical device was created from.
    #[inline]
    pub fn physical_device(&self) -> vk::PhysicalDevice {
        self.physical_device
    }

    /// The queue families in use.
    #[inline]
    pub fn queue_families(&self) -> QueueFamilyIndices {
        self.queue_families
    }

    /// Graphics queue.
    #[inline]
    pub fn graphics_queue(&self) -> vk::Queue {
        self.graphics_queue
    }

    /// Present queue. May be the same queue as graphics.
    #[inline]
    pub fn present_queue(&self) -> vk::Queue {
        self.present_queue
    }

    /// The GPU memory allocator.
    #[inline]
    pub fn allocator(&self) -> &Mutex<Allocator> {
        &self.allocator
    }

    /// Blocks until the device finishes all submitted work.
    pub fn wait_idle(&self) -> RhiResult<()> {
        unsafe { self.device.device_wait_idle()? };
        Ok(())
    }

    /// Submits command buffers to the graphics queue.
    ///
    /// # Safety
    ///
    /// The submit infos must reference live command buffers and sync
    /// objects, and `fence` must be unsignaled or null.
    pub unsafe fn submit_graphics(
        &self,
        submits: &[vk::SubmitInfo],
        fence: vk::Fence,
    ) -> RhiResult<()> {
        unsafe {
            self.device
                .queue_submit(self.graphics_queue, submits, fence)?
        };
        Ok(())
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        if let Err(e) = self.wait_idle() {
            warn!("wait_idle during device teardown failed: {e}");
        }
        unsafe {
            // Allocator must release its memory blocks while the device
            // is still alive.
            ManuallyDrop::drop(&mut self.allocator);
            self.device.destroy_device(None);
        }
        info!("logical device destroyed");
    }
}

// SAFETY: ash's device functions are externally synchronized where the
// spec requires it; the allocator is behind a Mutex and queue submission
// happens from one thread in this renderer.
unsafe impl Send for Device {}
unsafe impl Sync for Device {}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("physical_device", &self.physical_device)
            .field("queue_families", &self.queue_families)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn device_is_send_sync() {
        assert_send_sync::<Device>();
    }

    #[test]
    fn required_extensions_include_swapchain() {
        assert!(REQUIRED_DEVICE_EXTENSIONS.contains(&ash::khr::swapchain::NAME));
    }
}
