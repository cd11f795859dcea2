//! Bounding boxes and renormalization of paths
//!
//! Bounds always come from the rendered curve, never from the anchors
//! alone, because curvature can bulge outside the anchor hull. At rest a
//! path's coordinates are relative to its own box origin; the shape's
//! position absorbs the box minimum so local coordinates never go
//! negative.

use crate::geometry::point::AnchorPoint;
use crate::geometry::segment::path_segments;
use kurbo::{Point, Rect, Vec2};

/// Default threshold for [`bounds_changed`]
pub const BOUNDS_CHANGE_THRESHOLD: f64 = 0.01;

/// Renormalized points plus the offset the shape position must absorb
#[derive(Debug, Clone, PartialEq)]
pub struct BoundsUpdate {
    pub points: Vec<AnchorPoint>,
    pub w: f64,
    pub h: f64,
    /// Minimum corner of the old box; add this to the shape position
    pub offset: Vec2,
}

/// Smallest box holding every anchor and control point
fn point_cloud_bounds(points: &[AnchorPoint]) -> Rect {
    points
        .iter()
        .flat_map(AnchorPoint::all_points)
        .fold(None, |acc: Option<Rect>, p| {
            Some(match acc {
                Some(rect) => rect.union_pt(p),
                None => Rect::from_points(p, p),
            })
        })
        .unwrap_or(Rect::ZERO)
}

/// Tight bounds over every segment of the path
///
/// Paths with fewer than two points have no segments, so their box is
/// taken over the anchor and any control points instead.
pub fn accurate_bounds(points: &[AnchorPoint], is_closed: bool) -> Rect {
    if points.len() < 2 {
        return point_cloud_bounds(points);
    }
    path_segments(points, is_closed)
        .map(|(_, seg)| seg.bbox())
        .reduce(|a, b| a.union(b))
        .unwrap_or_else(|| point_cloud_bounds(points))
}

/// Re-base a path onto its own bounding box origin
///
/// Width and height never drop below 1 so zero-extent paths (a
/// horizontal line, say) still have a usable box.
pub fn recalculate_bounds(points: &[AnchorPoint], is_closed: bool) -> BoundsUpdate {
    let bounds = accurate_bounds(points, is_closed);
    let offset = bounds.origin().to_vec2();
    let points = points
        .iter()
        .map(|p| {
            let mut p = *p;
            p.translate(-offset);
            p
        })
        .collect();

    BoundsUpdate {
        points,
        w: bounds.width().max(1.0),
        h: bounds.height().max(1.0),
        offset,
    }
}

/// Whether the true extent moved enough to warrant renormalizing
pub fn bounds_changed(
    prev: &[AnchorPoint],
    next: &[AnchorPoint],
    is_closed: bool,
    threshold: f64,
) -> bool {
    rects_differ(
        accurate_bounds(prev, is_closed),
        accurate_bounds(next, is_closed),
        threshold,
    )
}

/// Compare origin, width and height of two boxes
pub fn rects_differ(a: Rect, b: Rect, threshold: f64) -> bool {
    (a.x0 - b.x0).abs() > threshold
        || (a.y0 - b.y0).abs() > threshold
        || (a.width() - b.width()).abs() > threshold
        || (a.height() - b.height()).abs() > threshold
}

/// Bounds for a path still being drawn
///
/// The box is symmetric around the first click so the shape's origin
/// doesn't jump around while points are added in arbitrary directions.
pub fn creation_bounds(points: &[AnchorPoint], origin: Point, padding: f64) -> Rect {
    let (reach_x, reach_y) = points
        .iter()
        .flat_map(AnchorPoint::all_points)
        .fold((0.0_f64, 0.0_f64), |(rx, ry), p| {
            (rx.max((p.x - origin.x).abs()), ry.max((p.y - origin.y).abs()))
        });

    Rect::new(
        origin.x - reach_x - padding,
        origin.y - reach_y - padding,
        origin.x + reach_x + padding,
        origin.y + reach_y + padding,
    )
}

/// Fixed padded box around a lone point and its controls
pub fn single_point_bounds(point: &AnchorPoint, padding: f64) -> Rect {
    point_cloud_bounds(std::slice::from_ref(point)).inflate(padding, padding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn triangle() -> Vec<AnchorPoint> {
        vec![
            AnchorPoint::new(10.0, 10.0),
            AnchorPoint::new(60.0, 20.0),
            AnchorPoint::new(30.0, 70.0),
        ]
    }

    #[test]
    fn corner_triangle_bounds_match_anchor_hull() {
        let bounds = accurate_bounds(&triangle(), true);
        assert_eq!(bounds, Rect::new(10.0, 10.0, 60.0, 70.0));
    }

    #[test]
    fn curved_bounds_exceed_anchor_hull() {
        let points = vec![
            AnchorPoint::new(0.0, 0.0).with_cp2(Point::new(0.0, -40.0)),
            AnchorPoint::new(100.0, 0.0).with_cp1(Point::new(100.0, -40.0)),
        ];
        let bounds = accurate_bounds(&points, false);
        assert_relative_eq!(bounds.y0, -30.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.y1, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_paths_use_point_cloud() {
        assert_eq!(accurate_bounds(&[], false), Rect::ZERO);

        let lone = AnchorPoint::new(5.0, 5.0).with_cp2(Point::new(10.0, 8.0));
        assert_eq!(accurate_bounds(&[lone], false), Rect::new(5.0, 5.0, 10.0, 8.0));
    }

    #[test]
    fn renormalization_moves_origin_into_offset() {
        let update = recalculate_bounds(&triangle(), true);
        assert_eq!(update.offset, Vec2::new(10.0, 10.0));
        assert_eq!(update.w, 50.0);
        assert_eq!(update.h, 60.0);
        assert_eq!(update.points[0].pos(), Point::ZERO);
        assert_eq!(update.points[1].pos(), Point::new(50.0, 10.0));
    }

    #[test]
    fn renormalization_is_idempotent() {
        let points = vec![
            AnchorPoint::new(-20.0, 15.0).with_cp2(Point::new(0.0, -40.0)),
            AnchorPoint::new(80.0, 30.0)
                .with_cp1(Point::new(90.0, -10.0))
                .with_cp2(Point::new(70.0, 70.0)),
            AnchorPoint::new(10.0, 90.0),
        ];
        let once = recalculate_bounds(&points, true);
        let twice = recalculate_bounds(&once.points, true);

        assert_relative_eq!(twice.offset.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(twice.offset.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(twice.w, once.w, epsilon = 1e-9);
        assert_relative_eq!(twice.h, once.h, epsilon = 1e-9);
        for (a, b) in once.points.iter().zip(&twice.points) {
            assert_relative_eq!(a.x, b.x, epsilon = 1e-9);
            assert_relative_eq!(a.y, b.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn flat_path_keeps_minimum_extent() {
        let points = vec![AnchorPoint::new(0.0, 5.0), AnchorPoint::new(10.0, 5.0)];
        let update = recalculate_bounds(&points, false);
        assert_eq!(update.w, 10.0);
        assert_eq!(update.h, 1.0);
    }

    #[test]
    fn bounds_change_detection() {
        let a = triangle();
        let mut b = a.clone();
        b[1].x += 0.001;
        assert!(!bounds_changed(&a, &b, true, BOUNDS_CHANGE_THRESHOLD));

        b[1].x += 5.0;
        assert!(bounds_changed(&a, &b, true, BOUNDS_CHANGE_THRESHOLD));

        // Interior moves don't change the box
        let mut c = a.clone();
        c.push(AnchorPoint::new(30.0, 30.0));
        assert!(!bounds_changed(&a, &c, true, BOUNDS_CHANGE_THRESHOLD));
    }

    #[test]
    fn creation_bounds_are_symmetric_around_origin() {
        let origin = Point::new(100.0, 100.0);
        let points = vec![
            AnchorPoint::new(100.0, 100.0),
            AnchorPoint::new(130.0, 90.0),
        ];
        let rect = creation_bounds(&points, origin, 10.0);
        assert_eq!(rect, Rect::new(60.0, 80.0, 140.0, 120.0));
        assert_eq!(rect.center(), origin);
    }

    #[test]
    fn single_point_gets_padded_box() {
        let rect = single_point_bounds(&AnchorPoint::new(5.0, 5.0), 50.0);
        assert_eq!(rect, Rect::new(-45.0, -45.0, 55.0, 55.0));
    }
}
