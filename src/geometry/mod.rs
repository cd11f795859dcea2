//! Geometric Primitives and Operations

pub mod bounds;
pub mod path_data;
pub mod point;
pub mod segment;
pub mod utilities;

// Re-export commonly used items
pub use bounds::{accurate_bounds, recalculate_bounds};
pub use path_data::path_data;
pub use point::{AnchorPoint, HandleId, HandleKind};
pub use segment::Segment;
