//! The frame driver.
//!
//! [`Renderer`] owns the whole Vulkan stack for one window and runs the
//! per-frame loop. Field order doubles as destruction order: everything
//! created from the device precedes it, and the device precedes the
//! surface and instance it was created from.

use std::path::Path;
use std::sync::Arc;

use ash::vk;
use glam::{Mat4, Vec3};
use tracing::{debug, info, warn};

use glint_core::RenderConfig;
use glint_platform::{Surface, Window, required_surface_extensions};
use glint_resources::MeshData;
use glint_rhi::buffer::{Buffer, BufferUsage};
use glint_rhi::descriptor::{DescriptorPool, DescriptorSetLayout, write_uniform_set};
use glint_rhi::device::Device;
use glint_rhi::instance::Instance;
use glint_rhi::pipeline::{Pipeline, PipelineLayout};
use glint_rhi::render_pass::{Framebuffers, RenderPass};
use glint_rhi::shader::{Shader, ShaderStage};
use glint_rhi::swapchain::{AcquireOutcome, PresentOutcome, Swapchain};
use glint_rhi::vertex::{self, InstanceData, Vertex};

use crate::error::RendererError;
use crate::frame::FrameManager;
use crate::overlay::Overlay;
use crate::recorder::{CommandRecorder, FrameDraw};
use crate::ubo::SceneUniform;

const VERTEX_SHADER_PATH: &str = "shaders/cube.vert.spv";
const FRAGMENT_SHADER_PATH: &str = "shaders/cube.frag.spv";

/// Everything needed to render one window, plus the per-frame loop.
pub struct Renderer {
    frame_manager: FrameManager,
    recorder: CommandRecorder,
    uniform_buffers: Vec<Buffer>,
    descriptor_sets: Vec<vk::DescriptorSet>,
    descriptor_pool: DescriptorPool,
    descriptor_layout: DescriptorSetLayout,
    vertex_buffer: Buffer,
    instance_buffer: Buffer,
    index_buffer: Buffer,
    pipeline: Pipeline,
    pipeline_layout: PipelineLayout,
    framebuffers: Framebuffers,
    render_pass: RenderPass,
    swapchain: Swapchain,
    device: Arc<Device>,
    surface: Surface,
    instance: Instance,

    config: RenderConfig,
    index_count: u32,
    instance_count: u32,
    window_size: (u32, u32),
    swapchain_stale: bool,
    scale: f32,
    overlay: Option<Box<dyn Overlay>>,
}

impl Renderer {
    /// Brings up the full stack for `window` and uploads `mesh`.
    ///
    /// Expects the compiled shaders next to the working directory under
    /// `shaders/`.
    pub fn new(
        window: &Window,
        config: RenderConfig,
        mesh: &MeshData,
    ) -> Result<Self, RendererError> {
        config.validate()?;

        let surface_extensions = required_surface_extensions(window)?;
        let instance = Instance::new(config.enable_validation, &surface_extensions)?;
        let surface = window.create_surface(instance.entry(), instance.handle())?;
        let device = Arc::new(Device::new(
            &instance,
            surface.loader(),
            surface.handle(),
        )?);

        let window_size = window.size();
        let swapchain = Swapchain::new(
            device.clone(),
            instance.handle(),
            surface.loader(),
            surface.handle(),
            window_size,
            config.present_mode,
        )?;

        let render_pass = RenderPass::new(device.clone(), swapchain.format())?;
        let framebuffers = Framebuffers::new(
            device.clone(),
            &render_pass,
            swapchain.image_views(),
            swapchain.extent(),
        )?;

        let descriptor_layout = DescriptorSetLayout::new_uniform(device.clone())?;
        let pipeline_layout =
            PipelineLayout::new(device.clone(), &[descriptor_layout.handle()])?;

        let vertex_shader = Shader::from_spirv_file(
            device.clone(),
            Path::new(VERTEX_SHADER_PATH),
            ShaderStage::Vertex,
        )?;
        let fragment_shader = Shader::from_spirv_file(
            device.clone(),
            Path::new(FRAGMENT_SHADER_PATH),
            ShaderStage::Fragment,
        )?;

        let (bindings, attributes) = vertex::input_descriptions();
        let pipeline = Pipeline::new_graphics(
            device.clone(),
            &render_pass,
            &pipeline_layout,
            &vertex_shader,
            &fragment_shader,
            &bindings,
            &attributes,
        )?;

        let vertices: Vec<Vertex> = (0..mesh.vertex_count())
            .map(|i| Vertex::new(mesh.positions[i], mesh.colors[i], mesh.tex_coords[i]))
            .collect();
        let vertex_buffer = Buffer::new_with_data(
            device.clone(),
            BufferUsage::Vertex,
            bytemuck::cast_slice(&vertices),
        )?;
        let index_buffer = Buffer::new_with_data(
            device.clone(),
            BufferUsage::Index,
            bytemuck::cast_slice(&mesh.indices),
        )?;

        // A short row of instances, spread along X.
        let instances = [
            InstanceData::new(Mat4::from_translation(Vec3::new(-1.5, 0.0, 0.0))),
            InstanceData::new(Mat4::IDENTITY),
            InstanceData::new(Mat4::from_translation(Vec3::new(1.5, 0.0, 0.0))),
        ];
        let instance_buffer = Buffer::new_with_data(
            device.clone(),
            BufferUsage::Instance,
            bytemuck::cast_slice(&instances),
        )?;

        let image_count = swapchain.image_count();
        let (uniform_buffers, descriptor_pool, descriptor_sets) =
            build_uniforms(&device, &descriptor_layout, image_count)?;

        let graphics_family = device
            .queue_families()
            .graphics
            .ok_or(glint_rhi::RhiError::NoSuitableGpu)?;
        let recorder =
            CommandRecorder::new(device.clone(), graphics_family, config.frames_in_flight)?;
        let frame_manager =
            FrameManager::new(device.clone(), config.frames_in_flight, image_count)?;

        info!(
            "renderer ready: {} frame slots, {} swapchain images, {} indices x{} instances",
            config.frames_in_flight,
            image_count,
            mesh.index_count(),
            instances.len()
        );

        Ok(Self {
            frame_manager,
            recorder,
            uniform_buffers,
            descriptor_sets,
            descriptor_pool,
            descriptor_layout,
            vertex_buffer,
            instance_buffer,
            index_buffer,
            pipeline,
            pipeline_layout,
            framebuffers,
            render_pass,
            swapchain,
            device,
            surface,
            instance,
            config,
            index_count: mesh.index_count() as u32,
            instance_count: instances.len() as u32,
            window_size,
            swapchain_stale: false,
            scale: 1.0,
            overlay: None,
        })
    }

    /// Records the new framebuffer size; the swapchain is recreated from
    /// inside the next tick, never from the event handler.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
        self.swapchain_stale = true;
    }

    /// Installs the overlay hook invoked inside the render pass.
    pub fn set_overlay(&mut self, overlay: Box<dyn Overlay>) {
        self.overlay = Some(overlay);
    }

    /// Uniform scale applied to the model, as the demo's one tunable.
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.clamp(0.1, 3.0);
    }

    /// Renders and presents one frame.
    ///
    /// `elapsed_secs` drives the animation. A minimized window makes this
    /// a no-op; a stale swapchain is recreated and the frame skipped.
    pub fn render_frame(&mut self, elapsed_secs: f32) -> Result<(), RendererError> {
        if self.window_size.0 == 0 || self.window_size.1 == 0 {
            return Ok(());
        }

        self.frame_manager.wait_current()?;

        let slot = self.frame_manager.slot();
        let image_available = self.frame_manager.current().image_available.handle();
        let render_finished = self.frame_manager.current().render_finished.handle();

        let image_index = match self.swapchain.acquire_next_image(image_available)? {
            AcquireOutcome::Ready {
                image_index,
                suboptimal: false,
            } => image_index as usize,
            // Stale at acquire: rebuild and try again next tick.
            AcquireOutcome::Ready {
                suboptimal: true, ..
            }
            | AcquireOutcome::OutOfDate => {
                self.recreate_swapchain()?;
                return Ok(());
            }
        };

        // Another slot may still have work in flight against this image.
        self.frame_manager.guard_image(image_index)?;

        // Point of no return: work will be submitted, so the fence may be
        // reset now.
        self.frame_manager.current().in_flight.reset()?;

        let draw = FrameDraw {
            render_pass: self.render_pass.handle(),
            framebuffer: self.framebuffers.get(image_index),
            extent: self.swapchain.extent(),
            clear_color: self.config.clear_color,
            pipeline: self.pipeline.handle(),
            pipeline_layout: self.pipeline_layout.handle(),
            descriptor_set: self.descriptor_sets[image_index],
            vertex_buffer: self.vertex_buffer.handle(),
            instance_buffer: self.instance_buffer.handle(),
            index_buffer: self.index_buffer.handle(),
            index_count: self.index_count,
            instance_count: self.instance_count,
        };
        let cmd = self
            .recorder
            .record(slot, &draw, self.overlay.as_deref_mut())?;

        let extent = self.swapchain.extent();
        let aspect = extent.width as f32 / extent.height as f32;
        let ubo = SceneUniform::animated(elapsed_secs, aspect, self.scale);
        self.uniform_buffers[image_index].write(0, bytemuck::bytes_of(&ubo))?;

        let wait_semaphores = [image_available];
        let wait_stages = [vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT];
        let command_buffers = [cmd];
        let signal_semaphores = [render_finished];
        let submit = vk::SubmitInfo::default()
            .wait_semaphores(&wait_semaphores)
            .wait_dst_stage_mask(&wait_stages)
            .command_buffers(&command_buffers)
            .signal_semaphores(&signal_semaphores);

        // SAFETY: all referenced handles are alive for this frame, and
        // the fence was reset above.
        unsafe {
            self.device
                .submit_graphics(&[submit], self.frame_manager.current().in_flight.handle())?;
        }

        let outcome = self
            .swapchain
            .present(render_finished, image_index as u32)?;
        if outcome == PresentOutcome::Stale || self.swapchain_stale {
            self.recreate_swapchain()?;
        }

        self.frame_manager.advance();
        Ok(())
    }

    /// Tears down and rebuilds everything sized to the swapchain.
    fn recreate_swapchain(&mut self) -> Result<(), RendererError> {
        if self.window_size.0 == 0 || self.window_size.1 == 0 {
            // Stay stale until the window has area again.
            debug!("deferring swapchain recreation while minimized");
            self.swapchain_stale = true;
            return Ok(());
        }

        self.device.wait_idle()?;

        self.swapchain.recreate(self.window_size)?;
        self.framebuffers.recreate(
            &self.render_pass,
            self.swapchain.image_views(),
            self.swapchain.extent(),
        )?;

        let image_count = self.swapchain.image_count();
        if image_count != self.uniform_buffers.len() {
            let (buffers, pool, sets) =
                build_uniforms(&self.device, &self.descriptor_layout, image_count)?;
            self.uniform_buffers = buffers;
            self.descriptor_sets = sets;
            self.descriptor_pool = pool;
        }
        // Every fence is idle after the barrier, so ownership is moot.
        self.frame_manager.reset_guards(image_count);

        self.swapchain_stale = false;
        Ok(())
    }

    /// Current swapchain extent, for aspect-dependent callers.
    pub fn extent(&self) -> (u32, u32) {
        let extent = self.swapchain.extent();
        (extent.width, extent.height)
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        // Fields destroy themselves in declaration order once the GPU is
        // quiet.
        if let Err(e) = self.device.wait_idle() {
            warn!("wait_idle during renderer teardown failed: {e}");
        }
        info!("renderer shut down");
    }
}

fn build_uniforms(
    device: &Arc<Device>,
    layout: &DescriptorSetLayout,
    image_count: usize,
) -> Result<(Vec<Buffer>, DescriptorPool, Vec<vk::DescriptorSet>), glint_rhi::RhiError> {
    let mut buffers = Vec::with_capacity(image_count);
    for _ in 0..image_count {
        buffers.push(Buffer::new(
            device.clone(),
            BufferUsage::Uniform,
            std::mem::size_of::<SceneUniform>() as vk::DeviceSize,
        )?);
    }

    let pool = DescriptorPool::new_uniform(device.clone(), image_count as u32)?;
    let layouts = vec![layout.handle(); image_count];
    let sets = pool.allocate(&layouts)?;

    for (set, buffer) in sets.iter().zip(&buffers) {
        write_uniform_set(device, *set, buffer);
    }

    Ok((buffers, pool, sets))
}
