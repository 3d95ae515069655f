//! Renderer error type.

use thiserror::Error;

/// Errors from the frame driver.
#[derive(Error, Debug)]
pub enum RendererError {
    #[error(transparent)]
    Rhi(#[from] glint_rhi::RhiError),

    #[error(transparent)]
    Platform(#[from] glint_platform::PlatformError),

    #[error(transparent)]
    Resource(#[from] glint_resources::ResourceError),

    #[error(transparent)]
    Config(#[from] glint_core::Error),
}
