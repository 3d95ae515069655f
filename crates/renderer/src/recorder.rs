//! Per-slot command buffer recording.

use std::sync::Arc;

use ash::vk;

use glint_rhi::RhiResult;
use glint_rhi::command::{CommandBuffer, CommandPool};
use glint_rhi::device::Device;

use crate::overlay::Overlay;

/// Everything one frame's command buffer needs to reference.
///
/// Raw handles only; the caller keeps the owning wrappers alive for the
/// duration of the frame.
pub struct FrameDraw {
    pub render_pass: vk::RenderPass,
    pub framebuffer: vk::Framebuffer,
    pub extent: vk::Extent2D,
    pub clear_color: [f32; 4],
    pub pipeline: vk::Pipeline,
    pub pipeline_layout: vk::PipelineLayout,
    pub descriptor_set: vk::DescriptorSet,
    pub vertex_buffer: vk::Buffer,
    pub instance_buffer: vk::Buffer,
    pub index_buffer: vk::Buffer,
    pub index_count: u32,
    pub instance_count: u32,
}

/// Command pool plus one primary buffer per frame slot.
///
/// Buffers are reset and re-recorded each frame, never reallocated.
pub struct CommandRecorder {
    device: Arc<Device>,
    pool: CommandPool,
    buffers: Vec<vk::CommandBuffer>,
}

impl CommandRecorder {
    pub fn new(device: Arc<Device>, queue_family: u32, slots: usize) -> RhiResult<Self> {
        let pool = CommandPool::new(device.clone(), queue_family)?;
        let buffers = pool.allocate(slots as u32)?;
        Ok(Self {
            device,
            pool,
            buffers,
        })
    }

    /// The raw buffer for `slot`, for submission.
    #[inline]
    pub fn buffer(&self, slot: usize) -> vk::CommandBuffer {
        self.buffers[slot]
    }

    /// Resets and re-records `slot`'s buffer for one frame.
    ///
    /// The slot's fence must have been waited on first; resetting a
    /// buffer the GPU is still executing is undefined.
    pub fn record(
        &self,
        slot: usize,
        draw: &FrameDraw,
        overlay: Option<&mut (dyn Overlay + 'static)>,
    ) -> RhiResult<vk::CommandBuffer> {
        let cmd = CommandBuffer::new(self.device.handle(), self.buffers[slot]);

        cmd.reset()?;
        cmd.begin()?;

        cmd.begin_render_pass(
            draw.render_pass,
            draw.framebuffer,
            draw.extent,
            draw.clear_color,
        );
        cmd.bind_graphics_pipeline(draw.pipeline);
        cmd.set_viewport_scissor(draw.extent);
        cmd.bind_vertex_buffers(0, &[draw.vertex_buffer, draw.instance_buffer]);
        cmd.bind_index_buffer(draw.index_buffer);
        cmd.bind_descriptor_set(draw.pipeline_layout, draw.descriptor_set);
        cmd.draw_indexed(draw.index_count, draw.instance_count);

        if let Some(overlay) = overlay {
            overlay.record(self.device.handle(), cmd.handle(), draw.extent);
        }

        cmd.end_render_pass();
        cmd.end()?;

        Ok(cmd.handle())
    }
}
