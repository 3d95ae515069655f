//! Window and Vulkan surface management.

use std::sync::Arc;

use ash::vk;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::{debug, info};
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window as WinitWindow, WindowAttributes};

use glint_core::WindowConfig;

use crate::error::PlatformResult;

/// RAII wrapper for a `vk::SurfaceKHR`.
///
/// The surface is destroyed on drop. The Vulkan instance it was created
/// from must outlive this value.
pub struct Surface {
    handle: vk::SurfaceKHR,
    loader: ash::khr::surface::Instance,
}

impl Surface {
    /// The raw surface handle. Valid only while this `Surface` is alive.
    #[inline]
    pub fn handle(&self) -> vk::SurfaceKHR {
        self.handle
    }

    /// The surface extension loader, for capability queries.
    #[inline]
    pub fn loader(&self) -> &ash::khr::surface::Instance {
        &self.loader
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        // SAFETY: the handle was created by ash_window::create_surface from
        // the same instance as the loader, and this is the sole owner.
        unsafe {
            self.loader.destroy_surface(self.handle, None);
        }
        debug!("Vulkan surface destroyed");
    }
}

/// Winit window wrapper with a cached size.
pub struct Window {
    window: Arc<WinitWindow>,
    width: u32,
    height: u32,
}

impl Window {
    /// Creates a resizable window from the given configuration.
    pub fn new(event_loop: &ActiveEventLoop, config: &WindowConfig) -> PlatformResult<Self> {
        let attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .with_resizable(true);

        let window = event_loop.create_window(attrs)?;
        info!("window created: {}x{}", config.width, config.height);

        Ok(Self {
            window: Arc::new(window),
            width: config.width,
            height: config.height,
        })
    }

    /// The underlying winit window.
    pub fn inner(&self) -> &WinitWindow {
        &self.window
    }

    /// Current framebuffer size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Records a new size. Call from the resize event handler.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        debug!("window resized: {}x{}", width, height);
    }

    /// Asks the compositor for another redraw.
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    /// Creates a Vulkan surface for this window.
    ///
    /// The returned [`Surface`] destroys itself on drop; `instance` must
    /// outlive it.
    pub fn create_surface(
        &self,
        entry: &ash::Entry,
        instance: &ash::Instance,
    ) -> PlatformResult<Surface> {
        let display_handle = self.window.display_handle()?;
        let window_handle = self.window.window_handle()?;

        // SAFETY: both handles come from a live winit window, and entry and
        // instance are valid for the duration of this call.
        let handle = unsafe {
            ash_window::create_surface(
                entry,
                instance,
                display_handle.as_raw(),
                window_handle.as_raw(),
                None,
            )?
        };

        let loader = ash::khr::surface::Instance::new(entry, instance);
        info!("Vulkan surface created");

        Ok(Surface { handle, loader })
    }
}

/// Instance extensions required to create a surface for `window`.
pub fn required_surface_extensions(window: &Window) -> PlatformResult<Vec<*const std::ffi::c_char>> {
    let display_handle = window.inner().display_handle()?;
    let extensions = ash_window::enumerate_required_extensions(display_handle.as_raw())?;
    Ok(extensions.to_vec())
}
