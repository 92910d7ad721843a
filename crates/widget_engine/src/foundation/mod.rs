//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the toolkit:
//! - Geometry types (points and rectangles)
//! - Time management
//! - Logging utilities

pub mod geometry;
pub mod logging;
pub mod time;
