//! Structural edits: deleting, inserting and retyping points
//!
//! These are pure functions over a point list. Each either returns the
//! edited list or an [`EditError`]; on error the caller keeps its
//! original points.

use crate::editing::error::{EditError, MIN_CLOSE_POINTS, MIN_EDIT_POINTS};
use crate::editing::smooth_curves::synthesize_handles;
use crate::geometry::point::AnchorPoint;
use crate::geometry::segment::{segment_count, segment_endpoints, Segment};
use std::collections::BTreeSet;

fn check_index(index: usize, len: usize) -> Result<(), EditError> {
    if index < len {
        Ok(())
    } else {
        Err(EditError::IndexOutOfRange { index, len })
    }
}

/// Remove the points at `indices`
///
/// Refused if fewer than two points would remain. Points are removed
/// from the highest index down so earlier removals don't shift later
/// ones.
pub fn delete_points(
    points: &[AnchorPoint],
    indices: &BTreeSet<usize>,
) -> Result<Vec<AnchorPoint>, EditError> {
    if indices.is_empty() {
        return Err(EditError::NothingSelected);
    }
    if let Some(&highest) = indices.last() {
        check_index(highest, points.len())?;
    }
    let remaining = points.len() - indices.len();
    if remaining < MIN_EDIT_POINTS {
        return Err(EditError::TooFewPoints {
            remaining,
            min: MIN_EDIT_POINTS,
        });
    }

    let mut out = points.to_vec();
    for &index in indices.iter().rev() {
        out.remove(index);
    }
    Ok(out)
}

/// Flip a point between corner and smooth
///
/// A point with any control point loses both. A corner gets symmetric
/// handles `reach` units either side, along the direction between its
/// neighbors (wrapping around on closed paths).
pub fn toggle_point_type(
    points: &[AnchorPoint],
    index: usize,
    is_closed: bool,
    reach: f64,
) -> Result<Vec<AnchorPoint>, EditError> {
    check_index(index, points.len())?;
    let mut out = points.to_vec();
    let len = out.len();

    if out[index].is_smooth() {
        out[index].make_corner();
        return Ok(out);
    }

    let prev = match index {
        0 if is_closed && len > 1 => Some(out[len - 1].pos()),
        0 => None,
        i => Some(out[i - 1].pos()),
    };
    let next = if index + 1 < len {
        Some(out[index + 1].pos())
    } else if is_closed && len > 1 {
        Some(out[0].pos())
    } else {
        None
    };

    let (cp1, cp2) = synthesize_handles(prev, out[index].pos(), next, reach);
    out[index].cp1 = Some(cp1);
    out[index].cp2 = Some(cp2);
    Ok(out)
}

/// Insert a point on segment `segment_index` at parameter `t`
///
/// The endpoints' facing handles are replaced by those of the two
/// sub-curves, and the new point gets tangent handles sized from the
/// whole segment's length. Splitting a straight segment inserts a
/// corner and leaves the endpoints alone. The closing segment of a
/// closed path appends the new point at the end.
///
/// Returns the new points and the index of the inserted point.
pub fn insert_on_segment(
    points: &[AnchorPoint],
    is_closed: bool,
    segment_index: usize,
    t: f64,
    handle_fraction: f64,
    accuracy: f64,
) -> Result<(Vec<AnchorPoint>, usize), EditError> {
    let len = points.len();
    let (left, right) = segment_endpoints(segment_index, len, is_closed).ok_or(
        EditError::IndexOutOfRange {
            index: segment_index,
            len: segment_count(len, is_closed),
        },
    )?;

    let seg = Segment::between(&points[left], &points[right]);
    let split = seg.split(t, handle_fraction, accuracy);
    let mut out = points.to_vec();

    let mut inserted = AnchorPoint::from_point(split.point);
    if let Some(handles) = split.handles {
        let left_curve = split.left.to_cubic();
        let right_curve = split.right.to_cubic();
        out[left].cp2 = Some(left_curve.p1);
        out[right].cp1 = Some(right_curve.p2);
        inserted.cp1 = Some(handles.incoming);
        inserted.cp2 = Some(handles.outgoing);
    }

    let new_index = left + 1;
    if right == 0 {
        out.push(inserted);
    } else {
        out.insert(new_index, inserted);
    }
    Ok((out, new_index))
}

/// Check that a path may be closed
pub fn can_close(len: usize, is_closed: bool) -> Result<(), EditError> {
    if is_closed {
        return Err(EditError::AlreadyClosed);
    }
    if len < MIN_CLOSE_POINTS {
        return Err(EditError::CannotClose { points: len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::path_data::path_data;
    use approx::assert_relative_eq;
    use kurbo::Point;

    fn line() -> Vec<AnchorPoint> {
        vec![AnchorPoint::new(0.0, 0.0), AnchorPoint::new(10.0, 0.0)]
    }

    fn square() -> Vec<AnchorPoint> {
        vec![
            AnchorPoint::new(0.0, 0.0),
            AnchorPoint::new(100.0, 0.0),
            AnchorPoint::new(100.0, 100.0),
            AnchorPoint::new(0.0, 100.0),
        ]
    }

    #[test]
    fn delete_removes_highest_first() {
        let out = delete_points(&square(), &BTreeSet::from([1, 3])).unwrap();
        assert_eq!(out, vec![AnchorPoint::new(0.0, 0.0), AnchorPoint::new(100.0, 100.0)]);
    }

    #[test]
    fn delete_refuses_to_leave_one_point() {
        let result = delete_points(&square(), &BTreeSet::from([0, 1, 2]));
        assert_eq!(result, Err(EditError::TooFewPoints { remaining: 1, min: 2 }));
        assert_eq!(
            delete_points(&line(), &BTreeSet::from([0])),
            Err(EditError::TooFewPoints { remaining: 1, min: 2 })
        );
    }

    #[test]
    fn delete_rejects_bad_input() {
        assert_eq!(
            delete_points(&square(), &BTreeSet::new()),
            Err(EditError::NothingSelected)
        );
        assert_eq!(
            delete_points(&square(), &BTreeSet::from([9])),
            Err(EditError::IndexOutOfRange { index: 9, len: 4 })
        );
    }

    #[test]
    fn toggle_smooth_point_strips_handles() {
        let mut points = square();
        points[1].cp2 = Some(Point::new(120.0, 10.0));
        let out = toggle_point_type(&points, 1, false, 30.0).unwrap();
        assert!(out[1].is_corner());
    }

    #[test]
    fn toggle_corner_uses_neighbor_direction() {
        let out = toggle_point_type(&square(), 1, false, 30.0).unwrap();
        // prev (0,0) to next (100,100): diagonal
        let cp2 = out[1].cp2.unwrap();
        let cp1 = out[1].cp1.unwrap();
        let d = std::f64::consts::FRAC_1_SQRT_2 * 30.0;
        assert_relative_eq!(cp2.x, 100.0 + d, epsilon = 1e-9);
        assert_relative_eq!(cp2.y, d, epsilon = 1e-9);
        assert_relative_eq!(cp1.x, 100.0 - d, epsilon = 1e-9);
        assert_relative_eq!(cp1.y, -d, epsilon = 1e-9);
    }

    #[test]
    fn toggle_wraps_neighbors_on_closed_path() {
        let open = toggle_point_type(&square(), 0, false, 10.0).unwrap();
        // Only the next neighbor: horizontal
        assert_eq!(open[0].cp2, Some(Point::new(10.0, 0.0)));

        let closed = toggle_point_type(&square(), 0, true, 10.0).unwrap();
        // From (0,100) to (100,0)
        let cp2 = closed[0].cp2.unwrap();
        assert!(cp2.x > 0.0 && cp2.y < 0.0);
    }

    #[test]
    fn toggle_out_of_range() {
        assert_eq!(
            toggle_point_type(&line(), 5, false, 10.0),
            Err(EditError::IndexOutOfRange { index: 5, len: 2 })
        );
    }

    #[test]
    fn inserting_on_a_line_stays_straight() {
        let (out, index) = insert_on_segment(&line(), false, 0, 0.5, 1.0 / 3.0, 1e-6).unwrap();
        assert_eq!(index, 1);
        assert_eq!(out.len(), 3);
        assert_relative_eq!(out[1].x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(out[1].y, 0.0, epsilon = 1e-9);
        assert_eq!(path_data(&out, false), "M 0 0 L 5 0 L 10 0");
    }

    #[test]
    fn inserting_on_a_curve_rewrites_facing_handles() {
        let points = vec![
            AnchorPoint::new(0.0, 0.0).with_cp2(Point::new(0.0, 50.0)),
            AnchorPoint::new(100.0, 0.0).with_cp1(Point::new(100.0, 50.0)),
        ];
        let (out, index) = insert_on_segment(&points, false, 0, 0.5, 1.0 / 3.0, 1e-6).unwrap();
        assert_eq!(index, 1);
        assert_relative_eq!(out[1].x, 50.0, epsilon = 1e-9);
        assert_relative_eq!(out[1].y, 37.5, epsilon = 1e-9);
        // de Casteljau at 0.5: left outgoing handle halves toward the control
        assert_eq!(out[0].cp2, Some(Point::new(0.0, 25.0)));
        assert_eq!(out[2].cp1, Some(Point::new(100.0, 25.0)));
        // Tangent at the apex is horizontal
        let cp1 = out[1].cp1.unwrap();
        let cp2 = out[1].cp2.unwrap();
        assert_relative_eq!(cp1.y, 37.5, epsilon = 1e-9);
        assert_relative_eq!(cp2.y, 37.5, epsilon = 1e-9);
        assert!(cp1.x < 50.0 && cp2.x > 50.0);
    }

    #[test]
    fn inserting_on_a_quadratic_raises_to_cubic_joins() {
        let points = vec![
            AnchorPoint::new(0.0, 0.0).with_cp2(Point::new(50.0, 100.0)),
            AnchorPoint::new(100.0, 0.0),
        ];
        assert_eq!(path_data(&points, false), "M 0 0 Q 50 100 100 0");
        let seg = Segment::between(&points[0], &points[1]);
        let split = seg.split(0.5, 1.0 / 3.0, 1e-6);
        let at_t = seg.eval(0.5);
        assert_relative_eq!(split.left.eval(1.0).distance(at_t), 0.0, epsilon = 1e-9);
        assert_relative_eq!(split.right.eval(0.0).distance(at_t), 0.0, epsilon = 1e-9);

        let (out, index) = insert_on_segment(&points, false, 0, 0.5, 1.0 / 3.0, 1e-6).unwrap();
        assert_eq!(index, 1);
        assert_relative_eq!(out[1].pos().distance(at_t), 0.0, epsilon = 1e-9);
        // Degree-raised halves of Q (0,0) (50,100) (100,0)
        let left_cp = out[0].cp2.unwrap();
        let right_cp = out[2].cp1.unwrap();
        assert_relative_eq!(left_cp.x, 50.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(left_cp.y, 100.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(right_cp.x, 250.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(right_cp.y, 100.0 / 3.0, epsilon = 1e-9);

        let d = path_data(&out, false);
        assert_eq!(d.matches(" C ").count(), 2, "{d}");
        assert!(!d.contains('Q'), "{d}");
    }

    #[test]
    fn inserting_on_closing_segment_appends() {
        let (out, index) = insert_on_segment(&square(), true, 3, 0.5, 1.0 / 3.0, 1e-6).unwrap();
        assert_eq!(index, 4);
        assert_eq!(out.len(), 5);
        assert_eq!(out[4].pos(), Point::new(0.0, 50.0));
    }

    #[test]
    fn inserting_on_missing_segment_is_rejected() {
        assert!(insert_on_segment(&square(), false, 3, 0.5, 1.0 / 3.0, 1e-6).is_err());
    }

    #[test]
    fn closing_rules() {
        assert_eq!(can_close(2, false), Err(EditError::CannotClose { points: 2 }));
        assert_eq!(can_close(3, true), Err(EditError::AlreadyClosed));
        assert_eq!(can_close(3, false), Ok(()));
    }
}
