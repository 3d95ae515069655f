//! glint demo binary.
//!
//! Opens a window and renders a row of spinning cubes, or the first mesh
//! of a glTF file passed as the only argument.

use std::path::PathBuf;

use anyhow::Context;
use tracing::{error, info};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

use glint_core::{AppConfig, Timer};
use glint_platform::Window;
use glint_renderer::Renderer;
use glint_resources::{MeshData, MeshSource};

struct App {
    config: AppConfig,
    mesh: MeshData,
    window: Option<Window>,
    renderer: Option<Renderer>,
    timer: Timer,
}

impl App {
    fn new(config: AppConfig, mesh: MeshData) -> Self {
        Self {
            config,
            mesh,
            window: None,
            renderer: None,
            timer: Timer::new(),
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window = Window::new(event_loop, &self.config.window)?;
        let renderer = Renderer::new(&window, self.config.render.clone(), &self.mesh)
            .context("renderer startup failed")?;

        self.window = Some(window);
        self.renderer = Some(renderer);
        self.timer.reset();
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            error!("initialization failed: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("close requested");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.logical_key == Key::Named(NamedKey::Escape) && event.state.is_pressed() {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(size) => {
                if let Some(window) = &mut self.window {
                    window.resize(size.width, size.height);
                }
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(renderer) = &mut self.renderer {
                    if let Err(e) = renderer.render_frame(self.timer.elapsed_secs()) {
                        error!("frame failed: {e}");
                        event_loop.exit();
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn load_mesh() -> anyhow::Result<MeshData> {
    match std::env::args().nth(1) {
        Some(path) => {
            let source = MeshSource::External(PathBuf::from(&path));
            let mesh = source.load().with_context(|| format!("loading {path}"))?;
            Ok(mesh)
        }
        None => Ok(MeshData::cube()),
    }
}

fn main() -> anyhow::Result<()> {
    glint_core::init_logging();

    let mesh = load_mesh()?;
    let mut app = App::new(AppConfig::default(), mesh);

    let event_loop = EventLoop::new().context("event loop creation failed")?;
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run_app(&mut app)?;
    Ok(())
}
