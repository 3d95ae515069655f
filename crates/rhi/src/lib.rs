//! Vulkan hardware interface for the glint renderer.
//!
//! Thin RAII wrappers over ash. Each type owns exactly one Vulkan object
//! (or a small fixed group) and destroys it on drop; lifetimes between
//! objects are expressed with `Arc<Device>`.

pub mod buffer;
pub mod command;
pub mod descriptor;
pub mod device;
pub mod error;
pub mod instance;
pub mod physical_device;
pub mod pipeline;
pub mod render_pass;
pub mod shader;
pub mod swapchain;
pub mod sync;
pub mod vertex;

pub use error::{RhiError, RhiResult};
