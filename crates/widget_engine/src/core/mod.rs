//! Core toolkit services
//!
//! Configuration loading and the error types shared across the crate.

pub mod config;

pub use config::{Config, ConfigError, ThemeConfig, ToolkitConfig, WindowConfig};
