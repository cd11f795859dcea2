//! Rejections raised by path edits
//!
//! An edit that would break a path invariant is refused and the path is
//! left untouched. The tools log these at debug level and carry on; none
//! of them is fatal.

use crate::geometry::point::MalformedHandleId;

/// A path must keep this many points while being edited
pub const MIN_EDIT_POINTS: usize = 2;

/// Closing a path needs at least this many points
pub const MIN_CLOSE_POINTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("path needs at least {min} points, only {remaining} would remain")]
    TooFewPoints { remaining: usize, min: usize },
    #[error("closing needs at least 3 points, path has {points}")]
    CannotClose { points: usize },
    #[error("path is already closed")]
    AlreadyClosed,
    #[error("index {index} out of range for {len} items")]
    IndexOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    InvalidHandle(#[from] MalformedHandleId),
    #[error("no points selected")]
    NothingSelected,
}
