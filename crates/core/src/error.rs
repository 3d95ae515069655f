//! Error type for the workspace foundation.

use thiserror::Error;

/// Errors produced by the core utilities.
#[derive(Error, Debug)]
pub enum Error {
    /// Rejected configuration values
    #[error("config error: {0}")]
    Config(String),

    /// IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything that should not happen
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result alias using the core [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
