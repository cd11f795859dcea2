//! Editing Functionality
//!
//! This module contains the operations that change a path:
//! - Selection of points
//! - Structural edits (delete, insert, toggle type, close)
//! - Handle, anchor and segment drags with smooth-handle mirroring
//! - The shape record those edits are applied to

pub mod error;
pub mod handle_drag;
pub mod point_ops;
pub mod selection;
pub mod shape;
pub mod smooth_curves;

// Re-export commonly used items
pub use error::EditError;
pub use shape::{BezierShape, ShapeId};
