//! Shared foundation for the glint renderer.
//!
//! This crate carries the pieces every other crate leans on:
//! - Configuration types handed to the renderer at construction
//! - Error type and result alias
//! - Logging initialization
//! - Frame timer

mod config;
mod error;
mod logging;
mod timer;

pub use config::{AppConfig, PresentModePreference, RenderConfig, WindowConfig};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use timer::Timer;
