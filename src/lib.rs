//! Penpath
pub mod core;
pub mod editing;
pub mod geometry;
pub mod logging;
pub mod tools;
