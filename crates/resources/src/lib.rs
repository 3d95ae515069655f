//! Mesh data for the glint renderer.
//!
//! CPU-side geometry only; turning a [`MeshData`] into GPU buffers is the
//! renderer's job.

mod error;
mod mesh;

pub use error::{ResourceError, ResourceResult};
pub use mesh::{MeshData, MeshSource};
