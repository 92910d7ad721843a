//! Configuration system
//!
//! All tunables the toolkit reads at startup live here, loadable from a TOML
//! file and falling back to sensible defaults field by field.

use serde::{Deserialize, Serialize};

use crate::theme::Theme;

/// Configuration trait
///
/// Any `Serialize + Deserialize + Default` struct gets file round-tripping
/// for free by implementing this marker.
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a TOML file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration to a TOML file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }

    /// Load from file if present, otherwise defaults
    fn load_or_default(path: &str) -> Self {
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(ConfigError::Io(_)) => {
                log::info!("no config at {path}, using defaults");
                Self::default()
            }
            Err(err) => {
                log::warn!("failed to parse {path}: {err}, using defaults");
                Self::default()
            }
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),
}

/// Top-level window settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Title of the host window
    pub title: String,
    /// Width of the host surface in pixels
    pub width: u32,
    /// Height of the host surface in pixels
    pub height: u32,
    /// Target frame rate for the shell loop
    pub target_fps: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Widget Engine".to_string(),
            width: 1024,
            height: 768,
            target_fps: 60,
        }
    }
}

/// Initial theme settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Theme hue in degrees, 0 to 360
    pub hue: f32,
    /// Theme contrast, 0 to 100
    pub contrast: f32,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            hue: 225.0,
            contrast: Theme::DEFAULT_CONTRAST,
        }
    }
}

impl ThemeConfig {
    /// Resolve into a concrete theme
    pub fn to_theme(&self) -> Theme {
        Theme::new(self.hue, self.contrast)
    }
}

/// Complete toolkit configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolkitConfig {
    /// Host window settings
    pub window: WindowConfig,
    /// Initial theme
    pub theme: ThemeConfig,
}

impl Config for ToolkitConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let config = ToolkitConfig::default();
        assert!(config.window.width > 0);
        assert!(config.window.target_fps > 0);
        assert_eq!(config.theme.contrast, Theme::DEFAULT_CONTRAST);
    }

    #[test]
    fn test_partial_toml_fills_remaining_fields() {
        let config: ToolkitConfig = toml::from_str(
            r#"
            [window]
            title = "Settings"
            width = 640

            [theme]
            hue = 120.0
            "#,
        )
        .unwrap();
        assert_eq!(config.window.title, "Settings");
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, WindowConfig::default().height);
        assert_eq!(config.theme.hue, 120.0);
        assert_eq!(config.theme.contrast, Theme::DEFAULT_CONTRAST);
    }

    #[test]
    fn test_theme_config_resolves_through_constructor() {
        let theme_cfg = ThemeConfig {
            hue: 480.0,
            contrast: 150.0,
        };
        let theme = theme_cfg.to_theme();
        assert_eq!(theme.hue, 120.0);
        assert_eq!(theme.contrast, 100.0);
    }
}
