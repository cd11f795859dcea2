//! Geometry utility functions
//!
//! Shared helpers for angle constraints, zoom-scaled thresholds and
//! direction vectors, so tools don't each grow their own copy.

use kurbo::{Point, Vec2};
use std::f64::consts::FRAC_PI_4;

/// Smallest zoom level used when scaling screen thresholds
pub const MIN_ZOOM: f64 = 1e-6;

/// Vectors shorter than this are treated as having no direction
pub const DIRECTION_EPSILON: f64 = 1e-9;

/// Convert a screen-pixel threshold into page/local units at `zoom`
///
/// Hit targets keep a constant on-screen size, so the local radius is
/// proportional to `1 / zoom`.
pub fn local_threshold(pixels: f64, zoom: f64) -> f64 {
    pixels / zoom.max(MIN_ZOOM)
}

/// Snap an offset vector to the nearest 45° direction, preserving length
/// (used when shift is held during a drag)
pub fn constrain_to_45(offset: Vec2) -> Vec2 {
    let length = offset.hypot();
    if length < DIRECTION_EPSILON {
        return offset;
    }
    let snapped = (offset.atan2() / FRAC_PI_4).round() * FRAC_PI_4;
    Vec2::from_angle(snapped) * length
}

/// Apply the 45° constraint only if requested
pub fn constrain_offset(offset: Vec2, constrain: bool) -> Vec2 {
    if constrain {
        constrain_to_45(offset)
    } else {
        offset
    }
}

/// Normalize a vector, falling back to `(1, 0)` when it is near zero
pub fn unit_or_default(v: Vec2) -> Vec2 {
    let length = v.hypot();
    if length < DIRECTION_EPSILON || !length.is_finite() {
        Vec2::new(1.0, 0.0)
    } else {
        v / length
    }
}

/// Mirror `handle` through `anchor`
pub fn mirror_through(anchor: Point, handle: Point) -> Point {
    anchor - (handle - anchor)
}
