//! The path shape record shared with the host
//!
//! A `BezierShape` is what the host stores, renders and hands back on
//! hit tests. At rest its points are local to `(x, y)` and the box
//! `(0, 0, w, h)` holds the whole rendered curve.

use crate::core::config::settings::CurveSettings;
use crate::editing::error::EditError;
use crate::editing::handle_drag::apply_handle_drag_by_id;
use crate::editing::point_ops::{can_close, delete_points, insert_on_segment, toggle_point_type};
use crate::editing::selection::{retain_valid, select_point};
use crate::geometry::bounds::{bounds_changed, recalculate_bounds};
use crate::geometry::path_data::path_data;
use crate::geometry::point::AnchorPoint;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// Host-side identifier of a shape
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(pub String);

impl ShapeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A Bézier path placed on the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BezierShape {
    pub id: ShapeId,
    /// Page position of the local origin
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub points: Vec<AnchorPoint>,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default)]
    pub edit_mode: bool,
    #[serde(default)]
    pub selected_point_indices: BTreeSet<usize>,
}

impl BezierShape {
    /// Build a normalized shape from page-space points
    pub fn from_page_points(id: ShapeId, points: &[AnchorPoint], is_closed: bool) -> Self {
        let mut shape = Self {
            id,
            x: 0.0,
            y: 0.0,
            w: 1.0,
            h: 1.0,
            points: points.to_vec(),
            is_closed,
            edit_mode: false,
            selected_point_indices: BTreeSet::new(),
        };
        shape.renormalize();
        shape
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn page_to_local(&self, page: Point) -> Point {
        page - self.position().to_vec2()
    }

    pub fn local_to_page(&self, local: Point) -> Point {
        local + self.position().to_vec2()
    }

    /// The shape's box in its own coordinates
    pub fn local_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.w, self.h)
    }

    /// The shape's box on the page
    pub fn page_bounds(&self) -> Rect {
        self.local_bounds() + self.position().to_vec2()
    }

    /// Points translated into page space
    pub fn page_points(&self) -> Vec<AnchorPoint> {
        let offset = self.position().to_vec2();
        self.points
            .iter()
            .map(|p| {
                let mut p = *p;
                p.translate(offset);
                p
            })
            .collect()
    }

    pub fn path_data(&self) -> String {
        path_data(&self.points, self.is_closed)
    }

    /// Re-base the points onto their bounding box origin
    ///
    /// The position absorbs the shift so nothing moves on the page.
    pub fn renormalize(&mut self) {
        let update = recalculate_bounds(&self.points, self.is_closed);
        self.points = update.points;
        self.w = update.w;
        self.h = update.h;
        self.x += update.offset.x;
        self.y += update.offset.y;
    }

    /// Renormalize only if the extent moved since `prev`
    ///
    /// Returns whether a renormalization happened. Otherwise only `w`
    /// and `h` are refreshed.
    pub fn renormalize_if_changed(&mut self, prev: &[AnchorPoint], threshold: f64) -> bool {
        if bounds_changed(prev, &self.points, self.is_closed, threshold) {
            self.renormalize();
            true
        } else {
            let update = recalculate_bounds(&self.points, self.is_closed);
            self.w = update.w;
            self.h = update.h;
            false
        }
    }

    pub fn enter_edit_mode(&mut self) {
        self.edit_mode = true;
    }

    /// Leave edit mode, dropping the selection and renormalizing
    pub fn exit_edit_mode(&mut self) {
        self.edit_mode = false;
        self.selected_point_indices.clear();
        self.renormalize();
    }

    pub fn toggle_edit_mode(&mut self) {
        if self.edit_mode {
            self.exit_edit_mode();
        } else {
            self.enter_edit_mode();
        }
    }

    /// Click on point `index`; see [`select_point`]
    pub fn select(&mut self, index: usize, additive: bool) -> Result<(), EditError> {
        if index >= self.points.len() {
            return Err(EditError::IndexOutOfRange {
                index,
                len: self.points.len(),
            });
        }
        self.selected_point_indices = select_point(&self.selected_point_indices, index, additive);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected_point_indices.clear();
    }

    /// Delete every selected point
    ///
    /// A closed path left with fewer than 3 points is re-opened.
    pub fn delete_selected(&mut self) -> Result<(), EditError> {
        let points = delete_points(&self.points, &self.selected_point_indices)?;
        debug!(
            "Deleted {} points from {}",
            self.selected_point_indices.len(),
            self.id
        );
        self.points = points;
        self.selected_point_indices.clear();
        if self.is_closed && can_close(self.points.len(), false).is_err() {
            debug!("Re-opening {} after deletion", self.id);
            self.is_closed = false;
        }
        self.renormalize();
        Ok(())
    }

    /// Flip a point between corner and smooth
    ///
    /// `scale` multiplies the configured handle length; the tools pass
    /// `1 / zoom` so new handles have a constant on-screen size.
    pub fn toggle_point_type(
        &mut self,
        index: usize,
        scale: f64,
        settings: &CurveSettings,
    ) -> Result<(), EditError> {
        let reach = settings.toggle_control_offset * scale;
        let prev = std::mem::take(&mut self.points);
        match toggle_point_type(&prev, index, self.is_closed, reach) {
            Ok(points) => {
                self.points = points;
                self.renormalize_if_changed(&prev, settings.bounds_change_threshold);
                Ok(())
            }
            Err(e) => {
                self.points = prev;
                Err(e)
            }
        }
    }

    /// Split segment `segment_index` at `t`; the new point becomes the
    /// sole selection
    pub fn insert_on_segment(
        &mut self,
        segment_index: usize,
        t: f64,
        settings: &CurveSettings,
    ) -> Result<usize, EditError> {
        let (points, index) = insert_on_segment(
            &self.points,
            self.is_closed,
            segment_index,
            t,
            settings.split_handle_fraction,
            settings.accuracy,
        )?;
        let prev = std::mem::replace(&mut self.points, points);
        self.selected_point_indices = BTreeSet::from([index]);
        self.renormalize_if_changed(&prev, settings.bounds_change_threshold);
        debug!("Inserted point {} on segment {} of {}", index, segment_index, self.id);
        Ok(index)
    }

    pub fn close(&mut self) -> Result<(), EditError> {
        can_close(self.points.len(), self.is_closed)?;
        self.is_closed = true;
        self.renormalize();
        Ok(())
    }

    /// Move the handle named by a host identifier to a local position
    ///
    /// No renormalization; callers decide when the drag has settled.
    pub fn apply_handle_drag(&mut self, handle: &str, local: Point, break_symmetry: bool) {
        self.points = apply_handle_drag_by_id(&self.points, handle, local, break_symmetry);
    }

    /// Keep the selection inside the point list
    pub fn sanitize_selection(&mut self) {
        retain_valid(&mut self.selected_point_indices, self.points.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn triangle() -> BezierShape {
        BezierShape::from_page_points(
            ShapeId::new("shape:a"),
            &[
                AnchorPoint::new(110.0, 210.0),
                AnchorPoint::new(160.0, 220.0),
                AnchorPoint::new(130.0, 270.0),
            ],
            true,
        )
    }

    #[test]
    fn page_points_are_normalized() {
        let shape = triangle();
        assert_eq!(shape.position(), Point::new(110.0, 210.0));
        assert_eq!(shape.points[0].pos(), Point::ZERO);
        assert_relative_eq!(shape.w, 50.0);
        assert_relative_eq!(shape.h, 60.0);
        assert_eq!(shape.page_points()[1].pos(), Point::new(160.0, 220.0));
        assert_eq!(shape.page_to_local(Point::new(120.0, 220.0)), Point::new(10.0, 10.0));
    }

    #[test]
    fn rejected_delete_leaves_shape_unchanged() {
        let mut shape = BezierShape::from_page_points(
            ShapeId::new("shape:b"),
            &[AnchorPoint::new(0.0, 0.0), AnchorPoint::new(10.0, 0.0)],
            false,
        );
        shape.select(0, false).unwrap();
        let before = shape.clone();
        assert!(shape.delete_selected().is_err());
        assert_eq!(shape, before);
        assert_eq!(shape.selected_point_indices, BTreeSet::from([0]));
    }

    #[test]
    fn deleting_below_three_reopens() {
        let mut shape = triangle();
        shape.select(2, false).unwrap();
        shape.delete_selected().unwrap();
        assert_eq!(shape.points.len(), 2);
        assert!(!shape.is_closed);
        assert!(shape.selected_point_indices.is_empty());
        // Remaining segment still sits where it did on the page
        assert_eq!(shape.page_points()[1].pos(), Point::new(160.0, 220.0));
    }

    #[test]
    fn exit_edit_mode_clears_selection() {
        let mut shape = triangle();
        shape.enter_edit_mode();
        shape.select(1, false).unwrap();
        shape.toggle_edit_mode();
        assert!(!shape.edit_mode);
        assert!(shape.selected_point_indices.is_empty());
    }

    #[test]
    fn drag_then_renormalize_keeps_page_geometry() {
        let mut shape = triangle();
        let prev = shape.points.clone();
        shape.apply_handle_drag("0:anchor", Point::new(-20.0, -10.0), false);
        assert!(shape.renormalize_if_changed(&prev, 0.01));
        assert_eq!(shape.position(), Point::new(90.0, 200.0));
        assert_eq!(shape.points[0].pos(), Point::ZERO);
        assert_eq!(shape.page_points()[2].pos(), Point::new(130.0, 270.0));
    }

    #[test]
    fn insert_selects_new_point() {
        let mut shape = triangle();
        shape.select(0, false).unwrap();
        let index = shape
            .insert_on_segment(2, 0.5, &CurveSettings::default())
            .unwrap();
        assert_eq!(index, 3);
        assert_eq!(shape.selected_point_indices, BTreeSet::from([3]));
    }

    #[test]
    fn close_needs_three_points() {
        let mut shape = triangle();
        assert_eq!(shape.close(), Err(EditError::AlreadyClosed));
        shape.is_closed = false;
        assert!(shape.close().is_ok());
        assert!(shape.is_closed);
    }

    #[test]
    fn serializes_for_the_host() {
        let json = serde_json::to_value(triangle()).unwrap();
        assert_eq!(json["id"], "shape:a");
        assert_eq!(json["isClosed"], true);
        assert_eq!(json["selectedPointIndices"], serde_json::json!([]));
    }
}
