//! Descriptor set layout, pool, and update helpers.
//!
//! The renderer binds exactly one uniform buffer (the scene transforms)
//! per swapchain image, so the surface here is deliberately small: a
//! single-binding layout and a pool sized per image.

use std::sync::Arc;

use ash::vk;
use tracing::debug;

use crate::buffer::Buffer;
use crate::device::Device;
use crate::error::RhiResult;

/// Set layout with one uniform buffer at binding 0, vertex stage.
pub struct DescriptorSetLayout {
    device: Arc<Device>,
    handle: vk::DescriptorSetLayout,
}

impl DescriptorSetLayout {
    pub fn new_uniform(device: Arc<Device>) -> RhiResult<Self> {
        let bindings = [vk::DescriptorSetLayoutBinding::default()
            .binding(0)
            .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
            .descriptor_count(1)
            .stage_flags(vk::ShaderStageFlags::VERTEX)];

        let create_info = vk::DescriptorSetLayoutCreateInfo::default().bindings(&bindings);
        let handle = unsafe {
            device
                .handle()
                .create_descriptor_set_layout(&create_info, None)?
        };

        Ok(Self { device, handle })
    }

    #[inline]
    pub fn handle(&self) -> vk::DescriptorSetLayout {
        self.handle
    }
}

impl Drop for DescriptorSetLayout {
    fn drop(&mut self) {
        unsafe {
            self.device
                .handle()
                .destroy_descriptor_set_layout(self.handle, None);
        }
    }
}

/// Pool sized for one uniform set per swapchain image.
pub struct DescriptorPool {
    device: Arc<Device>,
    handle: vk::DescriptorPool,
}

impl DescriptorPool {
    pub fn new_uniform(device: Arc<Device>, max_sets: u32) -> RhiResult<Self> {
        let sizes = [vk::DescriptorPoolSize::default()
            .ty(vk::DescriptorType::UNIFORM_BUFFER)
            .descriptor_count(max_sets)];

        let create_info = vk::DescriptorPoolCreateInfo::default()
            .pool_sizes(&sizes)
            .max_sets(max_sets);

        let handle = unsafe { device.handle().create_descriptor_pool(&create_info, None)? };
        debug!("descriptor pool created ({max_sets} sets)");

        Ok(Self { device, handle })
    }

    /// Allocates one set per entry in `layouts`.
    ///
    /// Sets are returned to the pool when it is destroyed or reset; there
    /// is no individual free.
    pub fn allocate(
        &self,
        layouts: &[vk::DescriptorSetLayout],
    ) -> RhiResult<Vec<vk::DescriptorSet>> {
        let allocate_info = vk::DescriptorSetAllocateInfo::default()
            .descriptor_pool(self.handle)
            .set_layouts(layouts);

        let sets = unsafe { self.device.handle().allocate_descriptor_sets(&allocate_info)? };
        Ok(sets)
    }

    #[inline]
    pub fn handle(&self) -> vk::DescriptorPool {
        self.handle
    }
}

impl Drop for DescriptorPool {
    fn drop(&mut self) {
        unsafe {
            self.device
                .handle()
                .destroy_descriptor_pool(self.handle, None);
        }
        debug!("descriptor pool destroyed");
    }
}

/// Points `set`'s binding 0 at the whole of `buffer`.
pub fn write_uniform_set(device: &Device, set: vk::DescriptorSet, buffer: &Buffer) {
    let buffer_info = [vk::DescriptorBufferInfo::default()
        .buffer(buffer.handle())
        .offset(0)
        .range(buffer.size())];

    let write = vk::WriteDescriptorSet::default()
        .dst_set(set)
        .dst_binding(0)
        .dst_array_element(0)
        .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
        .buffer_info(&buffer_info);

    unsafe {
        device.handle().update_descriptor_sets(&[write], &[]);
    }
}
