//! Configuration management
//!
//! This module handles all configuration aspects:
//! - CLI arguments parsing
//! - User configuration files
//! - Engine settings

pub mod settings;
pub mod user_config;

pub use crate::core::cli::CliArgs;
pub use settings::EditorSettings;
pub use user_config::ConfigFile;
