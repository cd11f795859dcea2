//! Core application functionality
//!
//! This module contains the host side of the engine, including:
//! - Settings and CLI handling
//! - The in-memory document standing in for a host canvas
//! - The script runner and process-level error handling

pub mod cli;
pub mod config;
pub mod document;
pub mod platform;
pub mod runner;

// Re-export commonly used items
pub use cli::CliArgs;
pub use document::Document;
pub use runner::run_app;
