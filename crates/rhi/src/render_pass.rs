//! Render pass and framebuffers.
//!
//! A single-subpass color-only pass: the attachment is cleared on load,
//! stored, and handed to the presentation engine in `PRESENT_SRC_KHR`
//! layout. One framebuffer per swapchain image view; both are rebuilt
//! when the swapchain is recreated.

use std::sync::Arc;

use ash::vk;
use tracing::debug;

use crate::device::Device;
use crate::error::RhiResult;

/// Single-subpass render pass targeting the swapchain format.
pub struct RenderPass {
    device: Arc<Device>,
    handle: vk::RenderPass,
}

impl RenderPass {
    pub fn new(device: Arc<Device>, color_format: vk::Format) -> RhiResult<Self> {
        let attachment = vk::AttachmentDescription::default()
            .format(color_format)
            .samples(vk::SampleCountFlags::TYPE_1)
            .load_op(vk::AttachmentLoadOp::CLEAR)
            .store_op(vk::AttachmentStoreOp::STORE)
            .stencil_load_op(vk::AttachmentLoadOp::DONT_CARE)
            .stencil_store_op(vk::AttachmentStoreOp::DONT_CARE)
            .initial_layout(vk::ImageLayout::UNDEFINED)
            .final_layout(vk::ImageLayout::PRESENT_SRC_KHR);

        let color_ref = [vk::AttachmentReference::default()
            .attachment(0)
            .layout(vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL)];

        let subpass = [vk::SubpassDescription::default()
            .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
            .color_attachments(&color_ref)];

        // The acquire semaphore waits at COLOR_ATTACHMENT_OUTPUT, so the
        // implicit transition must not start before that stage either.
        let dependency = [vk::SubpassDependency::default()
            .src_subpass(vk::SUBPASS_EXTERNAL)
            .dst_subpass(0)
            .src_stage_mask(vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT)
            .src_access_mask(vk::AccessFlags::empty())
            .dst_stage_mask(vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT)
            .dst_access_mask(vk::AccessFlags::COLOR_ATTACHMENT_WRITE)];

        let attachments = [attachment];
        let create_info = vk::RenderPassCreateInfo::default()
            .attachments(&attachments)
            .subpasses(&subpass)
            .dependencies(&dependency);

        let handle = unsafe { device.handle().create_render_pass(&create_info, None)? };
        debug!("render pass created for {color_format:?}");

        Ok(Self { device, handle })
    }

    #[inline]
    pub fn handle(&self) -> vk::RenderPass {
        self.handle
    }
}

impl Drop for RenderPass {
    fn drop(&mut self) {
        unsafe {
            self.device.handle().destroy_render_pass(self.handle, None);
        }
        debug!("render pass destroyed");
    }
}

/// One framebuffer per swapchain image view.
pub struct Framebuffers {
    device: Arc<Device>,
    handles: Vec<vk::Framebuffer>,
}

impl Framebuffers {
    pub fn new(
        device: Arc<Device>,
        render_pass: &RenderPass,
        image_views: &[vk::ImageView],
        extent: vk::Extent2D,
    ) -> RhiResult<Self> {
        let handles = build_framebuffers(&device, render_pass, image_views, extent)?;
        debug!("{} framebuffers created", handles.len());
        Ok(Self { device, handles })
    }

    /// Destroys the old framebuffers and builds a fresh set against the
    /// recreated swapchain's views. Requires a device-idle barrier first.
    pub fn recreate(
        &mut self,
        render_pass: &RenderPass,
        image_views: &[vk::ImageView],
        extent: vk::Extent2D,
    ) -> RhiResult<()> {
        self.destroy_all();
        self.handles = build_framebuffers(&self.device, render_pass, image_views, extent)?;
        debug!("{} framebuffers recreated", self.handles.len());
        Ok(())
    }

    fn destroy_all(&mut self) {
        unsafe {
            for framebuffer in self.handles.drain(..) {
                self.device.handle().destroy_framebuffer(framebuffer, None);
            }
        }
    }

    /// Framebuffer for the given swapchain image index.
    #[inline]
    pub fn get(&self, image_index: usize) -> vk::Framebuffer {
        self.handles[image_index]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl Drop for Framebuffers {
    fn drop(&mut self) {
        self.destroy_all();
        debug!("framebuffers destroyed");
    }
}

fn build_framebuffers(
    device: &Arc<Device>,
    render_pass: &RenderPass,
    image_views: &[vk::ImageView],
    extent: vk::Extent2D,
) -> RhiResult<Vec<vk::Framebuffer>> {
    let mut handles = Vec::with_capacity(image_views.len());
    for &view in image_views {
        let attachments = [view];
        let create_info = vk::FramebufferCreateInfo::default()
            .render_pass(render_pass.handle())
            .attachments(&attachments)
            .width(extent.width)
            .height(extent.height)
            .layers(1);

        let framebuffer = unsafe { device.handle().create_framebuffer(&create_info, None)? };
        handles.push(framebuffer);
    }
    Ok(handles)
}
