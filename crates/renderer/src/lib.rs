//! Frame lifecycle for the glint renderer.
//!
//! [`Renderer`] drives the per-frame loop: fence wait, image acquire,
//! command recording, uniform update, submit, present, and swapchain
//! recreation when the surface changes underneath it.

mod error;
mod frame;
mod overlay;
mod recorder;
mod renderer;
mod ubo;

pub use error::RendererError;
pub use frame::{FrameCursor, FrameManager, ImageGuards};
pub use overlay::Overlay;
pub use renderer::Renderer;
pub use ubo::SceneUniform;
