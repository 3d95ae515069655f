//! Renderer and window configuration.
//!
//! Tuning values are passed in explicitly at construction time rather than
//! read from module constants, so two renderers in one process can run with
//! different settings and tests can exercise non-default values.

use crate::error::{Error, Result};

/// Preferred presentation mode, resolved against what the surface offers.
///
/// FIFO is the only mode Vulkan guarantees, so every preference falls back
/// to it when the preferred mode is unavailable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PresentModePreference {
    /// Low-latency triple buffering when the driver supports it.
    #[default]
    Mailbox,
    /// Always use vsync-locked FIFO, even if Mailbox is available.
    Fifo,
}

/// Settings consumed by the renderer at construction.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Number of frames the CPU may record ahead of the GPU.
    pub frames_in_flight: usize,
    /// Presentation mode preference.
    pub present_mode: PresentModePreference,
    /// Clear color applied at the start of every frame, linear RGBA.
    pub clear_color: [f32; 4],
    /// Whether to request the Khronos validation layer.
    pub enable_validation: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            frames_in_flight: 2,
            present_mode: PresentModePreference::Mailbox,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            enable_validation: cfg!(debug_assertions),
        }
    }
}

impl RenderConfig {
    /// Checks the configuration for values the renderer cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.frames_in_flight == 0 {
            return Err(Error::Config(
                "frames_in_flight must be at least 1".to_string(),
            ));
        }
        // More slots than this just burns memory without hiding any latency.
        if self.frames_in_flight > 8 {
            return Err(Error::Config(format!(
                "frames_in_flight {} is unreasonably large (max 8)",
                self.frames_in_flight
            )));
        }
        Ok(())
    }
}

/// Initial window settings.
#[derive(Clone, Debug)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "glint".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// Top-level application configuration.
#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub render: RenderConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = RenderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.frames_in_flight, 2);
        assert_eq!(config.present_mode, PresentModePreference::Mailbox);
    }

    #[test]
    fn zero_frames_in_flight_is_rejected() {
        let config = RenderConfig {
            frames_in_flight: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn excessive_frames_in_flight_is_rejected() {
        let config = RenderConfig {
            frames_in_flight: 64,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_window_matches_initial_size() {
        let window = WindowConfig::default();
        assert_eq!((window.width, window.height), (800, 600));
    }
}
