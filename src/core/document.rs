//! In-memory page of shapes
//!
//! Stands in for a host canvas: it stores the shapes the tool creates,
//! applies the tool's effects and answers shape-level hit tests.

use crate::core::config::settings::HitTestSettings;
use crate::editing::shape::{BezierShape, ShapeId};
use crate::geometry::path_data::{fmt_num, path_data};
use crate::geometry::utilities::local_threshold;
use crate::tools::effects::Effect;
use kurbo::{Point, Rect};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Shapes in creation order; later shapes draw on top
    shapes: Vec<BezierShape>,
    /// Pending tick deadline requested by the tool
    pub scheduled_tick: Option<u64>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape on top, or replace the one with the same id in place
    pub fn insert(&mut self, shape: BezierShape) {
        match self.shapes.iter_mut().find(|s| s.id == shape.id) {
            Some(existing) => *existing = shape,
            None => self.shapes.push(shape),
        }
    }

    pub fn get(&self, id: &ShapeId) -> Option<&BezierShape> {
        self.shapes.iter().find(|s| &s.id == id)
    }

    pub fn remove(&mut self, id: &ShapeId) -> Option<BezierShape> {
        let index = self.shapes.iter().position(|s| &s.id == id)?;
        Some(self.shapes.remove(index))
    }

    pub fn shapes(&self) -> impl Iterator<Item = &BezierShape> {
        self.shapes.iter()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Apply the tool's effects; `now_ms` anchors scheduled ticks
    pub fn apply(&mut self, effects: &[Effect], now_ms: u64) {
        for effect in effects {
            match effect {
                Effect::CreateShape { shape } | Effect::UpdateShape { shape } => {
                    self.insert(shape.clone());
                }
                Effect::DeleteShape { id } => {
                    if self.remove(id).is_none() {
                        warn!("Delete of unknown shape {}", id);
                    }
                }
                Effect::ScheduleTick { delay_ms } => {
                    self.scheduled_tick = Some(now_ms.saturating_add(*delay_ms));
                }
                Effect::Preview { .. } | Effect::RefreshSelection { .. } => {
                    debug!("Host-only effect: {:?}", effect);
                }
            }
        }
    }

    /// Topmost shape whose box, grown by the segment radius, holds `page`
    ///
    /// A shape in edit mode wins over the others.
    pub fn shape_at(&self, page: Point, zoom: f64, settings: &HitTestSettings) -> Option<&BezierShape> {
        let tolerance = local_threshold(settings.segment_radius_px, zoom);
        let mut hits = self
            .shapes
            .iter()
            .rev()
            .filter(|shape| shape.page_bounds().inflate(tolerance, tolerance).contains(page));
        let first = hits.next()?;
        if first.edit_mode {
            return Some(first);
        }
        Some(hits.find(|shape| shape.edit_mode).unwrap_or(first))
    }

    /// Page-space box around every shape
    pub fn bounds(&self) -> Option<Rect> {
        self.shapes
            .iter()
            .map(BezierShape::page_bounds)
            .reduce(|a, b| a.union(b))
    }

    /// One SVG document with every shape at its page position
    pub fn to_svg(&self, stroke_width: f64) -> String {
        let pad = stroke_width.max(0.0);
        let bounds = self
            .bounds()
            .unwrap_or(Rect::new(0.0, 0.0, 1.0, 1.0))
            .inflate(pad, pad);

        let mut out = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
            fmt_num(bounds.x0),
            fmt_num(bounds.y0),
            fmt_num(bounds.width()),
            fmt_num(bounds.height())
        );
        for shape in &self.shapes {
            out.push_str(&format!(
                r#"<path id="{}" d="{}" fill="none" stroke="black" stroke-width="{}"/>"#,
                shape.id,
                path_data(&shape.page_points(), shape.is_closed),
                fmt_num(stroke_width)
            ));
        }
        out.push_str("</svg>");
        out
    }
}
