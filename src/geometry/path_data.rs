//! SVG path strings for rendering and export

use crate::geometry::point::AnchorPoint;
use crate::geometry::segment::path_segments;
use kurbo::{PathSeg, Point};
use std::fmt::Write;

/// Format a coordinate: 3 decimals at most, no trailing zeros, no `-0`
pub fn fmt_num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0 + 0.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{rounded}")
    }
}

fn push_point(out: &mut String, p: Point) {
    let _ = write!(out, " {} {}", fmt_num(p.x), fmt_num(p.y));
}

/// Path data for a point list
///
/// `M` starts the path, then one `L`, `Q` or `C` command per segment by
/// segment degree. A closed path only spells out its closing segment
/// when that segment is curved, then ends with `Z`.
pub fn path_data(points: &[AnchorPoint], is_closed: bool) -> String {
    let Some(first) = points.first() else {
        return String::new();
    };

    let mut out = String::from("M");
    push_point(&mut out, first.pos());

    for (i, seg) in path_segments(points, is_closed) {
        let closing = is_closed && i + 1 == points.len();
        match seg.0 {
            PathSeg::Line(_) if closing => {}
            PathSeg::Line(line) => {
                out.push_str(" L");
                push_point(&mut out, line.p1);
            }
            PathSeg::Quad(quad) => {
                out.push_str(" Q");
                push_point(&mut out, quad.p1);
                push_point(&mut out, quad.p2);
            }
            PathSeg::Cubic(cubic) => {
                out.push_str(" C");
                push_point(&mut out, cubic.p1);
                push_point(&mut out, cubic.p2);
                push_point(&mut out, cubic.p3);
            }
        }
    }

    if is_closed && points.len() > 2 {
        out.push_str(" Z");
    }
    out
}
