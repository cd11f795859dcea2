//! Editing an existing path
//!
//! The session owns the shape it edits. Every change is sent back to
//! the host as an `UpdateShape`; nothing else is looked up on the page.

use crate::core::config::settings::EditorSettings;
use crate::editing::handle_drag::{apply_handle_drag, apply_segment_drag};
use crate::editing::shape::BezierShape;
use crate::geometry::hit_test::{hit_test, PathHit};
use crate::geometry::point::{AnchorPoint, HandleId};
use crate::geometry::utilities::{constrain_offset, local_threshold, MIN_ZOOM};
use crate::tools::effects::Effect;
use crate::tools::input::{Key, Modifiers, Pointer};
use crate::tools::tool_state::ToolMode;
use kurbo::Point;
use tracing::{debug, info};

/// What an in-progress pointer drag moves
///
/// Control points are not here: the host's handle system drags them and
/// reports the moves as `handleDrag` events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragTarget {
    Anchor(usize),
    Segment(usize),
}

/// An active pointer drag, cleared on pointer-up
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub target: DragTarget,
    /// Page-space pointer position at press
    pub press: Point,
    /// Points as they were at press
    pub original: Vec<AnchorPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditingSession {
    pub shape: BezierShape,
    pub drag: Option<DragSession>,
    /// Time at which a pending off-shape exit takes effect
    pub pending_exit_ms: Option<u64>,
}

impl EditingSession {
    pub fn new(mut shape: BezierShape) -> Self {
        shape.enter_edit_mode();
        shape.sanitize_selection();
        debug!("Editing {}", shape.id);
        Self {
            shape,
            drag: None,
            pending_exit_ms: None,
        }
    }

    fn update(&self) -> Effect {
        Effect::UpdateShape {
            shape: self.shape.clone(),
        }
    }

    /// Whether a pending exit is due at `time_ms`
    pub fn exit_due(&self, time_ms: u64) -> bool {
        self.pending_exit_ms.is_some_and(|deadline| time_ms >= deadline)
    }

    /// Leave edit mode; the shape is renormalized on the way out
    pub fn exit(mut self) -> (ToolMode, Vec<Effect>) {
        self.shape.exit_edit_mode();
        info!("Finished editing {}", self.shape.id);
        let effects = vec![self.update()];
        (ToolMode::Idle, effects)
    }

    pub fn pointer_down(
        mut self,
        pointer: &Pointer,
        is_double_click: bool,
        settings: &EditorSettings,
    ) -> (ToolMode, Vec<Effect>) {
        let local = self.shape.page_to_local(pointer.point);
        let zoom = pointer.zoom;
        let modifiers = pointer.modifiers;
        self.pending_exit_ms = None;

        let hit = hit_test(
            &self.shape.points,
            self.shape.is_closed,
            local,
            zoom,
            &settings.hit_test,
            settings.curve.accuracy,
        );

        match hit {
            Some(PathHit::Anchor(index)) if is_double_click => {
                let scale = 1.0 / zoom.max(MIN_ZOOM);
                if let Err(e) = self.shape.toggle_point_type(index, scale, &settings.curve) {
                    debug!("Ignoring type toggle: {}", e);
                    return (ToolMode::Editing(self), Vec::new());
                }
                debug!("Toggled point {} of {}", index, self.shape.id);
            }
            Some(PathHit::Anchor(index)) => {
                if let Err(e) = self.shape.select(index, modifiers.additive()) {
                    debug!("Ignoring selection: {}", e);
                }
                self.start_drag(DragTarget::Anchor(index), pointer.point);
            }
            Some(PathHit::Control(handle)) => {
                debug!("Leaving {} of {} to the host's handle drag", handle, self.shape.id);
                return (ToolMode::Editing(self), Vec::new());
            }
            Some(PathHit::Segment { index, projection }) if modifiers.insert_on_segment() => {
                if let Err(e) = self
                    .shape
                    .insert_on_segment(index, projection.t, &settings.curve)
                {
                    debug!("Ignoring insertion: {}", e);
                    return (ToolMode::Editing(self), Vec::new());
                }
            }
            Some(PathHit::Segment { index, .. }) if settings.editing.segment_drag => {
                self.start_drag(DragTarget::Segment(index), pointer.point);
                return (ToolMode::Editing(self), Vec::new());
            }
            _ => {
                self.shape.clear_selection();
                let tolerance = local_threshold(settings.hit_test.segment_radius_px, zoom);
                let on_shape = self.shape.local_bounds().inflate(tolerance, tolerance).contains(local);
                if !on_shape {
                    let grace = settings.editing.exit_grace_ms;
                    if grace == 0 {
                        return self.exit();
                    }
                    debug!("Off-shape click, leaving {} in {}ms", self.shape.id, grace);
                    self.pending_exit_ms = Some(pointer.time_ms.saturating_add(grace));
                    let effects = vec![self.update(), Effect::ScheduleTick { delay_ms: grace }];
                    return (ToolMode::Editing(self), effects);
                }
            }
        }

        let effects = vec![self.update()];
        (ToolMode::Editing(self), effects)
    }

    fn start_drag(&mut self, target: DragTarget, press: Point) {
        self.drag = Some(DragSession {
            target,
            press,
            original: self.shape.points.clone(),
        });
    }

    pub fn pointer_move(mut self, pointer: &Pointer) -> (ToolMode, Vec<Effect>) {
        let Some(drag) = self.drag.take() else {
            return (ToolMode::Editing(self), Vec::new());
        };

        let modifiers = pointer.modifiers;
        let delta = constrain_offset(pointer.point - drag.press, modifiers.constrain_angle());
        let points = match drag.target {
            DragTarget::Anchor(index) => drag.original.get(index).map(|p| {
                apply_handle_drag(
                    &drag.original,
                    HandleId::anchor(index),
                    p.pos() + delta,
                    false,
                )
            }),
            DragTarget::Segment(index) => Some(apply_segment_drag(
                &drag.original,
                self.shape.is_closed,
                index,
                delta,
            )),
        };

        self.drag = Some(drag);
        match points {
            Some(points) => {
                self.shape.points = points;
                let effects = vec![self.update()];
                (ToolMode::Editing(self), effects)
            }
            None => (ToolMode::Editing(self), Vec::new()),
        }
    }

    pub fn pointer_up(mut self, settings: &EditorSettings) -> (ToolMode, Vec<Effect>) {
        let Some(drag) = self.drag.take() else {
            return (ToolMode::Editing(self), Vec::new());
        };
        if self.shape.points == drag.original {
            return (ToolMode::Editing(self), Vec::new());
        }
        if self
            .shape
            .renormalize_if_changed(&drag.original, settings.curve.bounds_change_threshold)
        {
            debug!("Renormalized {} after drag", self.shape.id);
        }
        let effects = vec![self.update()];
        (ToolMode::Editing(self), effects)
    }

    pub fn key_down(mut self, key: &Key) -> (ToolMode, Vec<Effect>) {
        let result = match key {
            Key::Escape | Key::Enter => return self.exit(),
            k if k.is_delete() => self.shape.delete_selected(),
            k if k.is_close() => self.shape.close(),
            _ => return (ToolMode::Editing(self), Vec::new()),
        };

        match result {
            Ok(()) => {
                let effects = vec![self.update()];
                (ToolMode::Editing(self), effects)
            }
            Err(e) => {
                debug!("Ignoring {:?} on {}: {}", key, self.shape.id, e);
                (ToolMode::Editing(self), Vec::new())
            }
        }
    }

    /// A drag reported by the host's handle system
    ///
    /// Cancels a pending exit: the click that scheduled it started a
    /// handle drag rather than leaving the shape. Any pointer drag is
    /// dropped too, since its original points predate the
    /// renormalization done here.
    pub fn handle_drag(
        mut self,
        handle: &str,
        page: Point,
        modifiers: Modifiers,
        settings: &EditorSettings,
    ) -> (ToolMode, Vec<Effect>) {
        self.pending_exit_ms = None;
        if self.drag.take().is_some() {
            debug!("Handle drag replaces pointer drag on {}", self.shape.id);
        }

        let prev = self.shape.points.clone();
        let local = self.shape.page_to_local(page);
        self.shape
            .apply_handle_drag(handle, local, modifiers.break_symmetry());
        if self.shape.points == prev {
            return (ToolMode::Editing(self), Vec::new());
        }
        self.shape
            .renormalize_if_changed(&prev, settings.curve.bounds_change_threshold);
        let effects = vec![self.update()];
        (ToolMode::Editing(self), effects)
    }
}
