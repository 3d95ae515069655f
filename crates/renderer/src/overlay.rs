//! Overlay injection point.

use ash::vk;

/// Hook for recording extra draw commands inside the render pass, after
/// the scene geometry. This is where an immediate-mode UI would plug in.
///
/// Called once per frame with the slot's command buffer while the render
/// pass is open; implementations must not begin or end passes, only
/// record draws compatible with the color-only pass.
pub trait Overlay {
    fn record(&mut self, device: &ash::Device, command_buffer: vk::CommandBuffer, extent: vk::Extent2D);
}
