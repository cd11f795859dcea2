//! Curve algebra over single path segments
//!
//! A segment joins two consecutive anchors. Its degree comes from the
//! control points facing each other across it:
//!
//! ```text
//! left.cp2  right.cp1   degree
//!   yes       yes       cubic      C left  left.cp2  right.cp1  right
//!   yes       no        quadratic  Q left  left.cp2             right
//!   no        yes       quadratic  Q left  right.cp1            right
//!   no        no        linear     L left                       right
//! ```
//!
//! The math itself is kurbo's; this module adds the editor-specific
//! pieces on top (tangent-balanced splitting, sampling by arc length,
//! wrapping segment indices for closed paths).

use crate::geometry::point::AnchorPoint;
use crate::geometry::utilities::unit_or_default;
use kurbo::{
    CubicBez, Line, ParamCurve, ParamCurveArclen, ParamCurveDeriv, ParamCurveExtrema,
    ParamCurveNearest, PathSeg, Point, QuadBez, Rect, Vec2,
};

/// Upper bound on samples per segment
pub const MAX_SAMPLES: usize = 4096;

/// Curve degree of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentDegree {
    Linear,
    Quadratic,
    Cubic,
}

/// Closest point on a segment to some query point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub t: f64,
    pub point: Point,
    pub distance: f64,
}

/// Handles synthesized for a point inserted by [`Segment::split`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitHandles {
    pub incoming: Point,
    pub outgoing: Point,
}

/// Result of splitting a segment at some parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitResult {
    pub left: Segment,
    pub right: Segment,
    pub point: Point,
    /// `None` for linear segments, which stay straight after a split
    pub handles: Option<SplitHandles>,
}

/// One segment of a path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment(pub PathSeg);

impl Segment {
    /// Build the segment running from `p1` to `p2`
    pub fn between(p1: &AnchorPoint, p2: &AnchorPoint) -> Self {
        let (a, b) = (p1.pos(), p2.pos());
        let seg = match (p1.cp2, p2.cp1) {
            (Some(c1), Some(c2)) => PathSeg::Cubic(CubicBez::new(a, c1, c2, b)),
            (Some(c), None) | (None, Some(c)) => PathSeg::Quad(QuadBez::new(a, c, b)),
            (None, None) => PathSeg::Line(Line::new(a, b)),
        };
        Segment(seg)
    }

    pub fn degree(&self) -> SegmentDegree {
        match self.0 {
            PathSeg::Line(_) => SegmentDegree::Linear,
            PathSeg::Quad(_) => SegmentDegree::Quadratic,
            PathSeg::Cubic(_) => SegmentDegree::Cubic,
        }
    }

    pub fn start(&self) -> Point {
        self.0.start()
    }

    pub fn end(&self) -> Point {
        self.0.end()
    }

    /// Point on the curve at `t` in `[0, 1]`
    pub fn eval(&self, t: f64) -> Point {
        self.0.eval(t.clamp(0.0, 1.0))
    }

    /// Raw (unnormalized) derivative at `t`
    pub fn derivative(&self, t: f64) -> Vec2 {
        let t = t.clamp(0.0, 1.0);
        match self.0 {
            PathSeg::Line(line) => line.p1 - line.p0,
            PathSeg::Quad(quad) => quad.deriv().eval(t).to_vec2(),
            PathSeg::Cubic(cubic) => cubic.deriv().eval(t).to_vec2(),
        }
    }

    /// Unit tangent at `t`, `(1, 0)` where the derivative vanishes
    pub fn unit_tangent(&self, t: f64) -> Vec2 {
        unit_or_default(self.derivative(t))
    }

    /// Closest point on this segment to `point`
    pub fn project(&self, point: Point, accuracy: f64) -> Projection {
        let nearest = self.0.nearest(point, accuracy);
        let t = nearest.t.clamp(0.0, 1.0);
        Projection {
            t,
            point: self.0.eval(t),
            distance: nearest.distance_sq.max(0.0).sqrt(),
        }
    }

    /// Arc length
    pub fn length(&self, accuracy: f64) -> f64 {
        self.0.arclen(accuracy)
    }

    /// Tight axis-aligned bounds of the curve (not the control hull)
    pub fn bbox(&self) -> Rect {
        self.0.bounding_box()
    }

    /// Split at `t`
    ///
    /// The sub-curves are exact. The handles for the new point are not
    /// taken from them: they run along the tangent at `t` with a length of
    /// `handle_fraction` times the whole segment's arc length, so a split
    /// near an end still gets usable handles.
    pub fn split(&self, t: f64, handle_fraction: f64, accuracy: f64) -> SplitResult {
        let t = t.clamp(0.0, 1.0);
        let left = Segment(self.0.subsegment(0.0..t));
        let right = Segment(self.0.subsegment(t..1.0));
        let point = self.0.eval(t);

        let handles = match self.0 {
            PathSeg::Line(_) => None,
            PathSeg::Quad(_) | PathSeg::Cubic(_) => {
                let reach = self.length(accuracy) * handle_fraction;
                let dir = self.unit_tangent(t);
                Some(SplitHandles {
                    incoming: point - dir * reach,
                    outgoing: point + dir * reach,
                })
            }
        };

        SplitResult {
            left,
            right,
            point,
            handles,
        }
    }

    /// Points spaced evenly by arc length along the curve
    ///
    /// Yields `n + 1` points (both endpoints included) where
    /// `n = max(min_samples, ceil(length / max_segment_length))`, capped
    /// at [`MAX_SAMPLES`].
    pub fn sample(
        &self,
        max_segment_length: f64,
        min_samples: usize,
        accuracy: f64,
    ) -> impl Iterator<Item = Point> {
        let seg = self.0;
        let length = seg.arclen(accuracy);
        let by_length = if max_segment_length > 0.0 && length.is_finite() {
            (length / max_segment_length).ceil().min(MAX_SAMPLES as f64) as usize
        } else {
            0
        };
        let count = by_length.max(min_samples).clamp(1, MAX_SAMPLES);

        (0..=count).map(move |i| {
            let fraction = i as f64 / count as f64;
            let t = if length > 1e-12 && i > 0 && i < count {
                seg.inv_arclen(length * fraction, accuracy)
            } else {
                fraction
            };
            seg.eval(t)
        })
    }

    /// The segment as a cubic, raising lines and quadratics
    pub fn to_cubic(&self) -> CubicBez {
        match self.0 {
            PathSeg::Line(line) => CubicBez::new(
                line.p0,
                line.p0.lerp(line.p1, 1.0 / 3.0),
                line.p0.lerp(line.p1, 2.0 / 3.0),
                line.p1,
            ),
            PathSeg::Quad(quad) => quad.raise(),
            PathSeg::Cubic(cubic) => cubic,
        }
    }
}

/// Number of segments in a path of `len` points
pub fn segment_count(len: usize, is_closed: bool) -> usize {
    match (len, is_closed) {
        (0 | 1, _) => 0,
        (n, true) => n,
        (n, false) => n - 1,
    }
}

/// Indices of the two anchors bounding segment `index`
///
/// The closing segment of a closed path wraps back to point 0.
pub fn segment_endpoints(index: usize, len: usize, is_closed: bool) -> Option<(usize, usize)> {
    if index >= segment_count(len, is_closed) {
        return None;
    }
    Some((index, (index + 1) % len))
}

/// Segment `index` of a path
pub fn path_segment(points: &[AnchorPoint], is_closed: bool, index: usize) -> Option<Segment> {
    let (a, b) = segment_endpoints(index, points.len(), is_closed)?;
    Some(Segment::between(&points[a], &points[b]))
}

/// All segments of a path, with their indices
pub fn path_segments(
    points: &[AnchorPoint],
    is_closed: bool,
) -> impl Iterator<Item = (usize, Segment)> + '_ {
    (0..segment_count(points.len(), is_closed))
        .filter_map(move |i| path_segment(points, is_closed, i).map(|seg| (i, seg)))
}

/// Flatten a whole path into a polyline
///
/// Joints between segments appear once. For closed paths the final
/// point repeats the first so the polyline closes visibly.
pub fn flatten(
    points: &[AnchorPoint],
    is_closed: bool,
    max_segment_length: f64,
    min_samples: usize,
    accuracy: f64,
) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::new();
    for (_, seg) in path_segments(points, is_closed) {
        let skip = usize::from(!out.is_empty());
        out.extend(
            seg.sample(max_segment_length, min_samples, accuracy)
                .skip(skip),
        );
    }
    if out.is_empty() {
        out.extend(points.iter().map(AnchorPoint::pos));
    }
    out
}

/// Build a kurbo path, for hosts that render through kurbo
pub fn to_bez_path(points: &[AnchorPoint], is_closed: bool) -> kurbo::BezPath {
    let mut path = kurbo::BezPath::new();
    let Some(first) = points.first() else {
        return path;
    };
    path.move_to(first.pos());
    for (i, seg) in path_segments(points, is_closed) {
        let closing = is_closed && i + 1 == points.len();
        match seg.0 {
            PathSeg::Line(_) if closing => {}
            PathSeg::Line(line) => path.line_to(line.p1),
            PathSeg::Quad(quad) => path.quad_to(quad.p1, quad.p2),
            PathSeg::Cubic(cubic) => path.curve_to(cubic.p1, cubic.p2, cubic.p3),
        }
    }
    if is_closed && points.len() > 2 {
        path.close_path();
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ACC: f64 = 1e-6;

    fn cubic_pair() -> (AnchorPoint, AnchorPoint) {
        (
            AnchorPoint::new(0.0, 0.0).with_cp2(Point::new(0.0, 50.0)),
            AnchorPoint::new(100.0, 0.0).with_cp1(Point::new(100.0, 50.0)),
        )
    }

    #[test]
    fn degree_follows_facing_controls() {
        let a = AnchorPoint::new(0.0, 0.0);
        let b = AnchorPoint::new(10.0, 0.0);
        assert_eq!(Segment::between(&a, &b).degree(), SegmentDegree::Linear);

        let a_out = a.with_cp2(Point::new(5.0, 5.0));
        assert_eq!(Segment::between(&a_out, &b).degree(), SegmentDegree::Quadratic);

        let b_in = b.with_cp1(Point::new(5.0, 5.0));
        assert_eq!(Segment::between(&a, &b_in).degree(), SegmentDegree::Quadratic);
        assert_eq!(Segment::between(&a_out, &b_in).degree(), SegmentDegree::Cubic);

        // The incoming handle of the left point plays no part
        let a_in_only = a.with_cp1(Point::new(-5.0, 5.0));
        assert_eq!(Segment::between(&a_in_only, &b).degree(), SegmentDegree::Linear);
    }

    #[test]
    fn evaluates_endpoints_and_midpoint() {
        let (a, b) = cubic_pair();
        let seg = Segment::between(&a, &b);
        assert_eq!(seg.eval(0.0), a.pos());
        assert_eq!(seg.eval(1.0), b.pos());
        let mid = seg.eval(0.5);
        assert_relative_eq!(mid.x, 50.0, epsilon = 1e-9);
        assert_relative_eq!(mid.y, 37.5, epsilon = 1e-9);
    }

    #[test]
    fn tangent_falls_back_for_degenerate_segment() {
        let p = AnchorPoint::new(3.0, 3.0);
        let seg = Segment::between(&p, &p);
        assert_eq!(seg.unit_tangent(0.5), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn unit_tangent_is_normalized() {
        let (a, b) = cubic_pair();
        let tangent = Segment::between(&a, &b).unit_tangent(0.3);
        assert_relative_eq!(tangent.hypot(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn projection_onto_line() {
        let seg = Segment::between(&AnchorPoint::new(0.0, 0.0), &AnchorPoint::new(10.0, 0.0));
        let hit = seg.project(Point::new(4.0, 3.0), ACC);
        assert_relative_eq!(hit.t, 0.4, epsilon = 1e-6);
        assert_relative_eq!(hit.point.x, 4.0, epsilon = 1e-6);
        assert_relative_eq!(hit.distance, 3.0, epsilon = 1e-6);

        // Past the end clamps to the endpoint
        let past = seg.project(Point::new(20.0, 0.0), ACC);
        assert_relative_eq!(past.t, 1.0, epsilon = 1e-9);
        assert_relative_eq!(past.distance, 10.0, epsilon = 1e-6);
    }

    #[test]
    fn split_pieces_meet_at_the_split_point() {
        let (a, b) = cubic_pair();
        let seg = Segment::between(&a, &b);
        for t in [0.1, 0.25, 0.5, 0.9] {
            let split = seg.split(t, 1.0 / 3.0, ACC);
            let expected = seg.eval(t);
            let left_end = split.left.eval(1.0);
            let right_start = split.right.eval(0.0);
            assert_relative_eq!(left_end.x, expected.x, epsilon = 1e-9);
            assert_relative_eq!(left_end.y, expected.y, epsilon = 1e-9);
            assert_relative_eq!(right_start.x, expected.x, epsilon = 1e-9);
            assert_relative_eq!(right_start.y, expected.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn split_handles_scale_with_whole_segment_length() {
        let (a, b) = cubic_pair();
        let seg = Segment::between(&a, &b);
        let length = seg.length(ACC);

        for t in [0.1, 0.5] {
            let split = seg.split(t, 1.0 / 3.0, ACC);
            let handles = split.handles.expect("curved segments get handles");
            assert_relative_eq!(
                (handles.outgoing - split.point).hypot(),
                length / 3.0,
                epsilon = 1e-6
            );
            assert_relative_eq!(
                (split.point - handles.incoming).hypot(),
                length / 3.0,
                epsilon = 1e-6
            );
            // Collinear through the split point
            let tangent = seg.unit_tangent(t);
            let out_dir = (handles.outgoing - split.point) / (length / 3.0);
            assert_relative_eq!(out_dir.x, tangent.x, epsilon = 1e-6);
            assert_relative_eq!(out_dir.y, tangent.y, epsilon = 1e-6);
        }
    }

    #[test]
    fn splitting_a_line_keeps_it_straight() {
        let seg = Segment::between(&AnchorPoint::new(0.0, 0.0), &AnchorPoint::new(10.0, 0.0));
        let split = seg.split(0.5, 1.0 / 3.0, ACC);
        assert_eq!(split.point, Point::new(5.0, 0.0));
        assert!(split.handles.is_none());
        assert_eq!(split.left.degree(), SegmentDegree::Linear);
    }

    #[test]
    fn bbox_includes_curvature_not_control_hull() {
        let (a, b) = cubic_pair();
        let bbox = Segment::between(&a, &b).bbox();
        assert_relative_eq!(bbox.x0, 0.0, epsilon = 1e-9);
        assert_relative_eq!(bbox.x1, 100.0, epsilon = 1e-9);
        assert_relative_eq!(bbox.y0, 0.0, epsilon = 1e-9);
        // Peak of the curve, well short of the control points at y = 50
        assert_relative_eq!(bbox.y1, 37.5, epsilon = 1e-9);
    }

    #[test]
    fn length_of_line() {
        let seg = Segment::between(&AnchorPoint::new(0.0, 0.0), &AnchorPoint::new(3.0, 4.0));
        assert_relative_eq!(seg.length(ACC), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn sampling_respects_counts() {
        let seg = Segment::between(&AnchorPoint::new(0.0, 0.0), &AnchorPoint::new(100.0, 0.0));
        let samples: Vec<_> = seg.sample(10.0, 2, ACC).collect();
        assert_eq!(samples.len(), 11);
        assert_eq!(samples[0], Point::new(0.0, 0.0));
        assert_eq!(samples[10], Point::new(100.0, 0.0));
        assert_relative_eq!(samples[3].x, 30.0, epsilon = 1e-6);

        let coarse: Vec<_> = seg.sample(1000.0, 4, ACC).collect();
        assert_eq!(coarse.len(), 5);
    }

    #[test]
    fn sampling_is_even_by_arc_length() {
        let (a, b) = cubic_pair();
        let seg = Segment::between(&a, &b);
        let samples: Vec<_> = seg.sample(5.0, 8, 1e-9).collect();
        let gaps: Vec<f64> = samples.windows(2).map(|w| w[0].distance(w[1])).collect();
        let longest = gaps.iter().cloned().fold(f64::MIN, f64::max);
        let shortest = gaps.iter().cloned().fold(f64::MAX, f64::min);
        assert!(longest - shortest < 0.1, "gaps vary too much: {shortest} .. {longest}");
    }

    #[test]
    fn sample_count_is_capped() {
        let seg = Segment::between(&AnchorPoint::new(0.0, 0.0), &AnchorPoint::new(100.0, 0.0));
        assert_eq!(seg.sample(1e-300, 1, ACC).count(), MAX_SAMPLES + 1);
        assert_eq!(seg.sample(10.0, usize::MAX, ACC).count(), MAX_SAMPLES + 1);

        let points = [
            AnchorPoint::new(0.0, 0.0),
            AnchorPoint::new(100.0, 0.0),
            AnchorPoint::new(100.0, 100.0),
        ];
        let poly = flatten(&points, false, f64::MIN_POSITIVE, 1, ACC);
        assert_eq!(poly.len(), 2 * MAX_SAMPLES + 1);
        assert_eq!(poly.last(), Some(&Point::new(100.0, 100.0)));
    }

    #[test]
    fn closed_paths_wrap_their_last_segment() {
        assert_eq!(segment_count(3, false), 2);
        assert_eq!(segment_count(3, true), 3);
        assert_eq!(segment_count(1, true), 0);
        assert_eq!(segment_endpoints(2, 3, true), Some((2, 0)));
        assert_eq!(segment_endpoints(2, 3, false), None);
    }

    #[test]
    fn flatten_shares_joints() {
        let points = [
            AnchorPoint::new(0.0, 0.0),
            AnchorPoint::new(10.0, 0.0),
            AnchorPoint::new(10.0, 10.0),
        ];
        let poly = flatten(&points, false, 100.0, 1, ACC);
        assert_eq!(
            poly,
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)]
        );

        let closed = flatten(&points, true, 100.0, 1, ACC);
        assert_eq!(closed.len(), 4);
        assert_eq!(closed.last(), Some(&Point::new(0.0, 0.0)));
    }

    #[test]
    fn bez_path_closes_without_duplicate_line() {
        let points = [
            AnchorPoint::new(0.0, 0.0),
            AnchorPoint::new(10.0, 0.0),
            AnchorPoint::new(10.0, 10.0),
        ];
        let path = to_bez_path(&points, true);
        // move, line, line, close
        assert_eq!(path.elements().len(), 4);
    }
}
