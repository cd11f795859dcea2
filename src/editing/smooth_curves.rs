//! Smooth point handling
//!
//! A smooth anchor keeps its two control points on one line through the
//! anchor. Moving one handle mirrors the other through the anchor, the
//! usual symmetric-handle behavior of vector editors.

use crate::geometry::point::{AnchorPoint, HandleKind};
use crate::geometry::utilities::{mirror_through, unit_or_default};
use kurbo::{Point, Vec2};
use tracing::debug;

/// Mirror the handle opposite `moved` through the anchor
///
/// Only an existing opposite handle is adjusted: mirroring into a
/// missing one would change the degree of the neighboring segment.
pub fn mirror_opposite_handle(point: &mut AnchorPoint, moved: HandleKind) {
    let Some(opposite) = moved.opposite() else {
        return;
    };
    let Some(moved_pos) = point.handle(moved) else {
        return;
    };
    let anchor = point.pos();
    let mirrored = mirror_through(anchor, moved_pos);

    match opposite {
        HandleKind::Cp1 if point.cp1.is_some() => point.cp1 = Some(mirrored),
        HandleKind::Cp2 if point.cp2.is_some() => point.cp2 = Some(mirrored),
        _ => return,
    }

    debug!(
        "Smooth constraint: {} moved to ({:.1}, {:.1}), {} mirrored to ({:.1}, {:.1})",
        moved.as_str(),
        moved_pos.x,
        moved_pos.y,
        opposite.as_str(),
        mirrored.x,
        mirrored.y
    );
}

/// Tangent direction for a corner being turned smooth
///
/// Runs from the previous neighbor to the next one, or along the single
/// neighbor there is, or horizontally for a lone point.
pub fn neighbor_direction(prev: Option<Point>, anchor: Point, next: Option<Point>) -> Vec2 {
    let raw = match (prev, next) {
        (Some(prev), Some(next)) => next - prev,
        (None, Some(next)) => next - anchor,
        (Some(prev), None) => anchor - prev,
        (None, None) => Vec2::new(1.0, 0.0),
    };
    unit_or_default(raw)
}

/// Symmetric handles `reach` units either side of the anchor
pub fn synthesize_handles(
    prev: Option<Point>,
    anchor: Point,
    next: Option<Point>,
    reach: f64,
) -> (Point, Point) {
    let dir = neighbor_direction(prev, anchor, next);
    (anchor - dir * reach, anchor + dir * reach)
}
