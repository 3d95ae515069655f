//! Windowing and surface glue for the glint renderer.
//!
//! Wraps winit window creation and Vulkan surface creation so the rest of
//! the workspace never touches raw window handles directly.

mod error;
mod window;

pub use error::{PlatformError, PlatformResult};
pub use window::{Surface, Window, required_surface_extensions};
