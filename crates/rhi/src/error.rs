//! RHI error type.

use thiserror::Error;

/// Errors from the Vulkan hardware interface.
#[derive(Error, Debug)]
pub enum RhiError {
    /// A Vulkan call returned an error code
    #[error("Vulkan error: {0}")]
    Vulkan(#[from] ash::vk::Result),

    /// The Vulkan loader could not be found or initialized
    #[error("failed to load Vulkan: {0}")]
    Loading(#[from] ash::LoadingError),

    /// GPU memory allocation failed
    #[error("allocation failed: {0}")]
    Allocation(#[from] gpu_allocator::AllocationError),

    /// No physical device satisfied the renderer's requirements
    #[error("no suitable GPU found")]
    NoSuitableGpu,

    /// Shader loading or module creation failed
    #[error("shader error: {0}")]
    Shader(String),

    /// Pipeline creation failed
    #[error("pipeline error: {0}")]
    Pipeline(String),

    /// Swapchain creation or query failed
    #[error("swapchain error: {0}")]
    Swapchain(String),

    /// A caller-supplied value was unusable
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result alias using [`RhiError`].
pub type RhiResult<T> = std::result::Result<T, RhiError>;
