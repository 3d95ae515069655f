//! Logging initialization.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initializes the tracing subscriber for the whole process.
///
/// Filtering comes from `RUST_LOG` when set; otherwise the renderer and
/// RHI crates log at debug and everything else at info.
///
/// # Example
/// ```
/// glint_core::init_logging();
/// tracing::info!("starting up");
/// ```
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,glint_renderer=debug,glint_rhi=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}
