//! Climate Archive Core Library
//!
//! Shared utilities for the climate archive services:
//! - Configuration loading (XDG-compliant)
//! - File system utilities
//! - Common constants

mod config;
pub mod fs;

pub use config::{find_config_file, load_config, ConfigSource};
pub use fs::{is_directory, path_exists};

/// Application name used for XDG paths
pub const APP_NAME: &str = "climate-archive";

/// Default API port
pub const DEFAULT_API_PORT: u16 = 5000;
