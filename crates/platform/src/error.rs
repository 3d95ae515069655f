//! Platform error type.

use thiserror::Error;

/// Errors from window or surface management.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Window creation failed
    #[error("window creation failed: {0}")]
    WindowCreation(#[from] winit::error::OsError),

    /// Raw window/display handle was unavailable
    #[error("window handle unavailable: {0}")]
    Handle(#[from] raw_window_handle::HandleError),

    /// Vulkan surface creation failed
    #[error("surface creation failed: {0}")]
    Surface(#[from] ash::vk::Result),
}

/// Result alias using [`PlatformError`].
pub type PlatformResult<T> = std::result::Result<T, PlatformError>;
