//! Path tool
//!
//! Turns host input events into path edits:
//! - Idle, waiting for a click on the canvas or a shape
//! - Creating a new path point by point
//! - Editing an existing path's points, handles and segments

pub mod creating;
pub mod double_click;
pub mod editing_session;
pub mod effects;
pub mod input;
pub mod tool_state;


pub use effects::Effect;
pub use input::{InputEvent, Key, Modifiers, Pointer};
pub use tool_state::{transition, PathTool, Session, ToolMode};
