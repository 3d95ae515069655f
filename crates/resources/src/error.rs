//! Resource loading errors.

use thiserror::Error;

/// Errors from mesh loading.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// glTF parsing or import failed
    #[error("glTF load failed for '{path}': {message}")]
    GltfLoad { path: String, message: String },

    /// The document contained no mesh primitives
    #[error("no meshes found in '{0}'")]
    NoMeshes(String),

    /// A primitive had no position data
    #[error("mesh primitive has no position data")]
    MissingPositions,

    /// IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias using [`ResourceError`].
pub type ResourceResult<T> = std::result::Result<T, ResourceError>;
