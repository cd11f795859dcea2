//! Drawing a new path
//!
//! Each click appends a point; dragging before release pulls out
//! handles. Points stay in page space until the path is finished, and
//! the shape the host sees uses a box centered on the first click so
//! its origin doesn't jump while the path grows.

use crate::core::config::settings::EditorSettings;
use crate::editing::error::MIN_EDIT_POINTS;
use crate::editing::point_ops::can_close;
use crate::editing::shape::{BezierShape, ShapeId};
use crate::geometry::bounds::{creation_bounds, single_point_bounds};
use crate::geometry::point::AnchorPoint;
use crate::geometry::utilities::{constrain_offset, local_threshold};
use crate::tools::effects::{refresh_effects, Effect};
use crate::tools::input::{Key, Pointer};
use crate::tools::tool_state::ToolMode;
use kurbo::{Point, Vec2};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// What the pointer is doing
#[derive(Debug, Clone, PartialEq)]
pub enum CreatingPhase {
    /// Pointer up, previewing the next point
    Hovering,
    /// Pointer down on a freshly placed point
    PlacingPoint {
        index: usize,
        press: Point,
        dragged: bool,
    },
    /// Pointer down on the first point to close the path
    ClosingDrag {
        /// First and last point as they were before the drag
        first: AnchorPoint,
        last: AnchorPoint,
        press: Point,
        dragged: bool,
    },
}

/// The preview is locked onto the first point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapState {
    /// Where the cursor was when the snap engaged
    pub entered_at: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatingSession {
    pub shape_id: ShapeId,
    /// Page-space points
    pub points: Vec<AnchorPoint>,
    /// The first click; creation bounds are centered here
    pub origin: Point,
    pub phase: CreatingPhase,
    pub snap: Option<SnapState>,
    pub first_point_dragged: bool,
}

impl CreatingSession {
    /// Start a path at `pointer` and announce the new shape
    pub fn start(
        shape_id: ShapeId,
        pointer: &Pointer,
        settings: &EditorSettings,
    ) -> (CreatingSession, Vec<Effect>) {
        let session = CreatingSession {
            shape_id,
            points: vec![AnchorPoint::from_point(pointer.point)],
            origin: pointer.point,
            phase: CreatingPhase::PlacingPoint {
                index: 0,
                press: pointer.point,
                dragged: false,
            },
            snap: None,
            first_point_dragged: false,
        };
        info!(
            "Started path {} at ({:.1}, {:.1})",
            session.shape_id, pointer.point.x, pointer.point.y
        );
        let shape = session.snapshot(settings);
        (session, vec![Effect::CreateShape { shape }])
    }

    /// Handles stay visible while the lone first point may still be
    /// dragged, and during any drag
    pub fn forced_edit_mode(&self) -> bool {
        let dragging = match self.phase {
            CreatingPhase::PlacingPoint { dragged, .. } => dragged,
            CreatingPhase::ClosingDrag { .. } => true,
            CreatingPhase::Hovering => false,
        };
        (self.points.len() == 1 && !self.first_point_dragged) || dragging
    }

    /// The in-progress shape as the host should see it
    pub fn snapshot(&self, settings: &EditorSettings) -> BezierShape {
        let bounds = match self.points.as_slice() {
            [only] => single_point_bounds(only, settings.creation.single_point_padding),
            points => creation_bounds(points, self.origin, settings.creation.creation_padding),
        };
        let offset = bounds.origin().to_vec2();
        let points = self
            .points
            .iter()
            .map(|p| {
                let mut p = *p;
                p.translate(-offset);
                p
            })
            .collect();

        BezierShape {
            id: self.shape_id.clone(),
            x: bounds.x0,
            y: bounds.y0,
            w: bounds.width().max(1.0),
            h: bounds.height().max(1.0),
            points,
            is_closed: matches!(self.phase, CreatingPhase::ClosingDrag { .. }),
            edit_mode: self.forced_edit_mode(),
            selected_point_indices: BTreeSet::new(),
        }
    }

    fn update(&self, settings: &EditorSettings) -> Effect {
        Effect::UpdateShape {
            shape: self.snapshot(settings),
        }
    }

    fn first(&self) -> Option<Point> {
        self.points.first().map(AnchorPoint::pos)
    }

    pub fn pointer_down(
        mut self,
        pointer: &Pointer,
        is_double_click: bool,
        settings: &EditorSettings,
    ) -> (ToolMode, Vec<Effect>) {
        if is_double_click {
            debug!("✒️ PEN: double-click completes {}", self.shape_id);
            return self.finish(false, settings);
        }

        let zoom = pointer.zoom;
        let ends = self.points.first().copied().zip(self.points.last().copied());
        if self.snap.take().is_some() && self.points.len() >= 3 {
            if let Some((first, last)) = ends {
                debug!("✒️ PEN: closing drag on {}", self.shape_id);
                self.phase = CreatingPhase::ClosingDrag {
                    first,
                    last,
                    press: pointer.point,
                    dragged: false,
                };
                let effects = vec![self.update(settings)];
                return (ToolMode::Creating(self), effects);
            }
        }

        if let Some(first) = self.first() {
            let radius = local_threshold(settings.creation.close_click_radius_px, zoom);
            if self.points.len() >= 3 && first.distance(pointer.point) <= radius {
                debug!("✒️ PEN: direct click on first point closes {}", self.shape_id);
                return self.finish(true, settings);
            }
        }

        let index = self.points.len();
        self.points.push(AnchorPoint::from_point(pointer.point));
        self.phase = CreatingPhase::PlacingPoint {
            index,
            press: pointer.point,
            dragged: false,
        };
        debug!(
            "✒️ PEN: point {} at ({:.1}, {:.1})",
            index, pointer.point.x, pointer.point.y
        );
        let effects = vec![self.update(settings)];
        (ToolMode::Creating(self), effects)
    }

    pub fn pointer_move(mut self, pointer: &Pointer, settings: &EditorSettings) -> (ToolMode, Vec<Effect>) {
        let threshold = local_threshold(settings.creation.drag_threshold_px, pointer.zoom);
        let modifiers = pointer.modifiers;

        let effects = match self.phase.clone() {
            CreatingPhase::PlacingPoint { index, press, .. } => {
                let offset = constrain_offset(pointer.point - press, modifiers.constrain_angle());
                let dragged = offset.hypot() > threshold;
                if let Some(point) = self.points.get_mut(index) {
                    if dragged {
                        point.cp2 = Some(press + offset);
                        if !modifiers.break_symmetry() {
                            point.cp1 = Some(press - offset);
                        }
                    } else {
                        point.make_corner();
                    }
                }
                if index == 0 && dragged {
                    self.first_point_dragged = true;
                }
                self.phase = CreatingPhase::PlacingPoint {
                    index,
                    press,
                    dragged,
                };
                vec![self.update(settings)]
            }
            CreatingPhase::ClosingDrag {
                first, last, press, ..
            } => {
                // The press may land anywhere in the snap zone, so only
                // movement since the press counts as a drag
                let dragged = (pointer.point - press).hypot() > threshold;
                let offset =
                    constrain_offset(pointer.point - first.pos(), modifiers.constrain_angle());
                self.apply_closing_handles(first, last, offset, dragged, modifiers.break_symmetry());
                self.phase = CreatingPhase::ClosingDrag {
                    first,
                    last,
                    press,
                    dragged,
                };
                vec![self.update(settings)]
            }
            CreatingPhase::Hovering => {
                let snapped = self.update_snap(pointer.point, pointer.zoom, settings);
                let point = match (snapped, self.first()) {
                    (true, Some(first)) => first,
                    _ => pointer.point,
                };
                vec![Effect::Preview {
                    shape_id: self.shape_id.clone(),
                    point: Some(point),
                    snapped,
                }]
            }
        };
        (ToolMode::Creating(self), effects)
    }

    pub fn pointer_up(mut self, settings: &EditorSettings) -> (ToolMode, Vec<Effect>) {
        match self.phase {
            CreatingPhase::Hovering => (ToolMode::Creating(self), Vec::new()),
            CreatingPhase::PlacingPoint { .. } => {
                self.phase = CreatingPhase::Hovering;
                let effects = vec![self.update(settings)];
                (ToolMode::Creating(self), effects)
            }
            CreatingPhase::ClosingDrag { .. } => self.finish(true, settings),
        }
    }

    pub fn key_down(self, key: &Key, settings: &EditorSettings) -> (ToolMode, Vec<Effect>) {
        match key {
            Key::Enter => self.finish(false, settings),
            Key::Escape => {
                info!("Cancelled path {}", self.shape_id);
                (ToolMode::Idle, self.discard())
            }
            k if k.is_close() => {
                if let Err(e) = can_close(self.points.len(), false) {
                    debug!("Ignoring close of {}: {}", self.shape_id, e);
                    return (ToolMode::Creating(self), Vec::new());
                }
                self.finish(true, settings)
            }
            _ => (ToolMode::Creating(self), Vec::new()),
        }
    }

    /// Hysteresis: engage within the snap radius of the first point,
    /// release only once past the wider release radius from where the
    /// snap engaged
    fn update_snap(&mut self, cursor: Point, zoom: f64, settings: &EditorSettings) -> bool {
        let Some(first) = self.first() else {
            return false;
        };
        if self.points.len() < 3 {
            self.snap = None;
            return false;
        }

        match self.snap {
            Some(snap) => {
                let release = local_threshold(settings.creation.release_threshold_px, zoom);
                if snap.entered_at.distance(cursor) > release {
                    debug!("✒️ PEN: released snap on {}", self.shape_id);
                    self.snap = None;
                }
            }
            None => {
                let engage = local_threshold(settings.creation.snap_threshold_px, zoom);
                if first.distance(cursor) < engage {
                    debug!("✒️ PEN: snapped to first point of {}", self.shape_id);
                    self.snap = Some(SnapState { entered_at: cursor });
                }
            }
        }
        self.snap.is_some()
    }

    /// Outgoing handle on the last point and incoming handle on the
    /// first; only the first point's handle with break-symmetry
    fn apply_closing_handles(
        &mut self,
        first: AnchorPoint,
        last: AnchorPoint,
        offset: Vec2,
        dragged: bool,
        break_symmetry: bool,
    ) {
        let last_index = self.points.len() - 1;
        self.points[0] = first;
        self.points[last_index] = last;
        if !dragged {
            return;
        }
        self.points[0].cp1 = Some(first.pos() - offset);
        if !break_symmetry {
            self.points[last_index].cp2 = Some(last.pos() + offset);
        }
    }

    /// End creation, committing the path or dropping it if too short
    fn finish(self, close: bool, settings: &EditorSettings) -> (ToolMode, Vec<Effect>) {
        if self.points.len() < MIN_EDIT_POINTS {
            info!("Discarding path {} with {} point(s)", self.shape_id, self.points.len());
            return (ToolMode::Idle, self.discard());
        }

        let shape = BezierShape::from_page_points(self.shape_id.clone(), &self.points, close);
        info!(
            "Finished path {}: {} points, closed={}",
            shape.id,
            shape.points.len(),
            shape.is_closed
        );

        let mut effects = vec![
            Effect::Preview {
                shape_id: self.shape_id.clone(),
                point: None,
                snapped: false,
            },
            Effect::UpdateShape { shape },
        ];
        effects.extend(refresh_effects(&self.shape_id, &settings.editing.refresh_delays_ms));
        (ToolMode::Idle, effects)
    }

    fn discard(self) -> Vec<Effect> {
        vec![
            Effect::Preview {
                shape_id: self.shape_id.clone(),
                point: None,
                snapped: false,
            },
            Effect::DeleteShape { id: self.shape_id },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn session_with(points: &[(f64, f64)]) -> CreatingSession {
        CreatingSession {
            shape_id: ShapeId::new("shape:path-1"),
            points: points.iter().map(|&(x, y)| AnchorPoint::new(x, y)).collect(),
            origin: Point::new(points[0].0, points[0].1),
            phase: CreatingPhase::Hovering,
            snap: None,
            first_point_dragged: true,
        }
    }

    #[test]
    fn single_point_snapshot_uses_fixed_padding() {
        let settings = EditorSettings::default();
        let (session, _) = CreatingSession::start(
            ShapeId::new("shape:path-1"),
            &Pointer::new(100.0, 100.0, 0),
            &settings,
        );
        let shape = session.snapshot(&settings);
        assert_eq!(shape.position(), Point::new(50.0, 50.0));
        assert_eq!(shape.w, 100.0);
        assert_eq!(shape.points[0].pos(), Point::new(50.0, 50.0));
        assert!(shape.edit_mode);
    }

    #[test]
    fn creation_box_is_centered_on_first_click() {
        let settings = EditorSettings::default();
        let session = session_with(&[(100.0, 100.0), (130.0, 90.0)]);
        let shape = session.snapshot(&settings);
        assert_relative_eq!(shape.x, 60.0);
        assert_relative_eq!(shape.y, 80.0);
        assert_relative_eq!(shape.w, 80.0);
        assert_relative_eq!(shape.h, 40.0);
        assert!(!shape.edit_mode);
    }

    #[test]
    fn snap_needs_three_points() {
        let settings = EditorSettings::default();
        let mut session = session_with(&[(0.0, 0.0), (100.0, 0.0)]);
        assert!(!session.update_snap(Point::new(1.0, 1.0), 1.0, &settings));
    }

    #[test]
    fn snap_hysteresis() {
        let settings = EditorSettings::default();
        let mut session = session_with(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)]);
        assert!(!session.update_snap(Point::new(13.0, 0.0), 1.0, &settings));
        assert!(session.update_snap(Point::new(11.0, 0.0), 1.0, &settings));
        // Past the snap radius but inside the release band
        assert!(session.update_snap(Point::new(20.0, 0.0), 1.0, &settings));
        assert!(!session.update_snap(Point::new(36.0, 0.0), 1.0, &settings));
    }

    #[test]
    fn closing_handles_respect_break_symmetry() {
        let mut session = session_with(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)]);
        let first = session.points[0];
        let last = session.points[2];
        session.apply_closing_handles(first, last, Vec2::new(10.0, 0.0), true, true);
        assert_eq!(session.points[0].cp1, Some(Point::new(-10.0, 0.0)));
        assert_eq!(session.points[2].cp2, None);

        session.apply_closing_handles(first, last, Vec2::new(10.0, 0.0), true, false);
        assert_eq!(session.points[2].cp2, Some(Point::new(110.0, 100.0)));

        // Falling back under the threshold restores the originals
        session.apply_closing_handles(first, last, Vec2::new(1.0, 0.0), false, false);
        assert!(session.points[0].is_corner());
        assert!(session.points[2].is_corner());
    }

    fn closed_shape(effects: &[Effect]) -> BezierShape {
        effects
            .iter()
            .find_map(Effect::shape)
            .cloned()
            .expect("finishing emits the committed shape")
    }

    #[test]
    fn jitter_after_snapped_press_closes_with_corners() {
        let settings = EditorSettings::default();
        let session = session_with(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)]);
        let (mode, _) = session.pointer_move(&Pointer::new(10.0, 0.0, 100), &settings);
        let ToolMode::Creating(session) = mode else { panic!("still creating") };
        assert!(session.snap.is_some());

        let (mode, _) = session.pointer_down(&Pointer::new(10.0, 0.0, 200), false, &settings);
        let ToolMode::Creating(session) = mode else { panic!("still creating") };
        let (mode, _) = session.pointer_move(&Pointer::new(10.5, 0.0, 220), &settings);
        let ToolMode::Creating(session) = mode else { panic!("still creating") };
        let (mode, effects) = session.pointer_up(&settings);

        assert!(matches!(mode, ToolMode::Idle));
        let shape = closed_shape(&effects);
        assert!(shape.is_closed);
        assert!(shape.points.iter().all(AnchorPoint::is_corner));
    }

    #[test]
    fn dragging_from_snapped_press_pulls_handles_from_first_point() {
        let settings = EditorSettings::default();
        let session = session_with(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)]);
        let (mode, _) = session.pointer_move(&Pointer::new(10.0, 0.0, 100), &settings);
        let ToolMode::Creating(session) = mode else { panic!("still creating") };
        let (mode, _) = session.pointer_down(&Pointer::new(10.0, 0.0, 200), false, &settings);
        let ToolMode::Creating(session) = mode else { panic!("still creating") };
        let (mode, _) = session.pointer_move(&Pointer::new(30.0, 0.0, 220), &settings);
        let ToolMode::Creating(session) = mode else { panic!("still creating") };

        assert_eq!(session.points[0].cp1, Some(Point::new(-30.0, 0.0)));
        assert_eq!(session.points[2].cp2, Some(Point::new(130.0, 100.0)));
    }
}
