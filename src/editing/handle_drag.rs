//! Dragging anchors, control points and segments
//!
//! Drags are applied against the points as they were when the drag
//! started, so repeated pointer moves never accumulate rounding drift.

use crate::editing::smooth_curves::mirror_opposite_handle;
use crate::geometry::point::{AnchorPoint, HandleId, HandleKind};
use crate::geometry::segment::segment_endpoints;
use kurbo::{Point, Vec2};
use tracing::{debug, warn};

/// Move one handle to `new_pos`
///
/// An anchor carries its control points along rigidly. A control point
/// moves alone and, unless `break_symmetry` is set, its opposite is
/// mirrored through the anchor. A one-sided point stays one-sided: no
/// opposite handle is created, so the neighboring segment keeps its
/// degree. An index past the end leaves the points unchanged.
pub fn apply_handle_drag(
    points: &[AnchorPoint],
    handle: HandleId,
    new_pos: Point,
    break_symmetry: bool,
) -> Vec<AnchorPoint> {
    let mut out = points.to_vec();
    let Some(point) = out.get_mut(handle.point_index) else {
        debug!(
            "Ignoring drag of {} on a path with {} points",
            handle,
            points.len()
        );
        return out;
    };

    match handle.kind {
        HandleKind::Anchor => {
            let delta = new_pos - point.pos();
            point.translate(delta);
        }
        HandleKind::Cp1 => {
            point.cp1 = Some(new_pos);
            if !break_symmetry {
                mirror_opposite_handle(point, HandleKind::Cp1);
            }
        }
        HandleKind::Cp2 => {
            point.cp2 = Some(new_pos);
            if !break_symmetry {
                mirror_opposite_handle(point, HandleKind::Cp2);
            }
        }
    }
    out
}

/// [`apply_handle_drag`] for a host handle identifier string
pub fn apply_handle_drag_by_id(
    points: &[AnchorPoint],
    handle: &str,
    new_pos: Point,
    break_symmetry: bool,
) -> Vec<AnchorPoint> {
    match handle.parse::<HandleId>() {
        Ok(id) => apply_handle_drag(points, id, new_pos, break_symmetry),
        Err(e) => {
            warn!("{}", e);
            points.to_vec()
        }
    }
}

/// Pull a segment's bulge by `delta`
///
/// The segment's outgoing and incoming handles move by `delta` from
/// where they were in `original`. A missing handle starts at its
/// anchor, so dragging a straight segment curves it.
pub fn apply_segment_drag(
    original: &[AnchorPoint],
    is_closed: bool,
    segment_index: usize,
    delta: Vec2,
) -> Vec<AnchorPoint> {
    let mut out = original.to_vec();
    let Some((left, right)) = segment_endpoints(segment_index, original.len(), is_closed) else {
        debug!("Ignoring drag of missing segment {}", segment_index);
        return out;
    };

    let left_base = original[left].cp2.unwrap_or(original[left].pos());
    let right_base = original[right].cp1.unwrap_or(original[right].pos());
    out[left].cp2 = Some(left_base + delta);
    out[right].cp1 = Some(right_base + delta);
    out
}
