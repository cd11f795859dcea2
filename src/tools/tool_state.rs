//! Path tool state - single source of truth for what the tool is doing
//!
//! The tool is a pure transition function over [`Session`]: an event
//! and the current session go in, the next session and the effects for
//! the host come out. [`PathTool`] wraps that for hosts that prefer a
//! mutable object.

use crate::core::config::settings::EditorSettings;
use crate::editing::shape::{BezierShape, ShapeId};
use crate::tools::creating::CreatingSession;
use crate::tools::double_click::ClickTracker;
use crate::tools::editing_session::EditingSession;
use crate::tools::effects::Effect;
use crate::tools::input::{InputEvent, Pointer};
use std::mem;
use tracing::{debug, info};

/// What the tool is currently doing
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ToolMode {
    #[default]
    Idle,
    Creating(CreatingSession),
    Editing(EditingSession),
}

impl ToolMode {
    pub fn name(&self) -> &'static str {
        match self {
            ToolMode::Idle => "idle",
            ToolMode::Creating(_) => "creating",
            ToolMode::Editing(_) => "editing",
        }
    }
}

/// Everything the tool carries between events
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub mode: ToolMode,
    pub clicks: ClickTracker,
    next_shape: u64,
}

impl Session {
    /// Synthetic id for a new path: `shape:path-1`, `shape:path-2`, ...
    fn allocate_id(&mut self) -> ShapeId {
        self.next_shape += 1;
        ShapeId::new(format!("shape:path-{}", self.next_shape))
    }
}

/// Apply one event to a session
pub fn transition(
    mut session: Session,
    event: &InputEvent,
    settings: &EditorSettings,
) -> (Session, Vec<Effect>) {
    let mut effects = Vec::new();

    // An overdue off-shape exit fires before anything else is handled
    let exit_due = match (&session.mode, event.time_ms()) {
        (ToolMode::Editing(editing), Some(time_ms)) => editing.exit_due(time_ms),
        _ => false,
    };
    if exit_due {
        if let ToolMode::Editing(editing) = mem::take(&mut session.mode) {
            let (mode, exit_effects) = editing.exit();
            session.mode = mode;
            effects.extend(exit_effects);
        }
    }

    let before = session.mode.name();
    let mode = mem::take(&mut session.mode);

    let (mode, new_effects) = match event {
        InputEvent::PointerDown { pointer, target } => {
            let is_double = session.clicks.register(
                pointer.point,
                pointer.time_ms,
                pointer.zoom,
                &settings.double_click,
            );
            match mode {
                ToolMode::Idle => {
                    idle_pointer_down(&mut session, pointer, target.as_ref(), is_double, settings)
                }
                ToolMode::Creating(creating) => creating.pointer_down(pointer, is_double, settings),
                ToolMode::Editing(editing) => editing.pointer_down(pointer, is_double, settings),
            }
        }
        InputEvent::PointerMove { pointer } => match mode {
            ToolMode::Creating(creating) => creating.pointer_move(pointer, settings),
            ToolMode::Editing(editing) => editing.pointer_move(pointer),
            idle => (idle, Vec::new()),
        },
        InputEvent::PointerUp { .. } => match mode {
            ToolMode::Creating(creating) => creating.pointer_up(settings),
            ToolMode::Editing(editing) => editing.pointer_up(settings),
            idle => (idle, Vec::new()),
        },
        InputEvent::KeyDown { key, .. } => match mode {
            ToolMode::Creating(creating) => creating.key_down(key, settings),
            ToolMode::Editing(editing) => editing.key_down(key),
            idle => (idle, Vec::new()),
        },
        InputEvent::HandleDrag {
            handle,
            point,
            modifiers,
        } => match mode {
            ToolMode::Editing(editing) => editing.handle_drag(handle, *point, *modifiers, settings),
            other => {
                debug!("Ignoring handle drag of {} while {}", handle, other.name());
                (other, Vec::new())
            }
        },
        // Due exits were handled above
        InputEvent::Tick { .. } => (mode, Vec::new()),
    };

    session.mode = mode;
    effects.extend(new_effects);

    let after = session.mode.name();
    if before != after {
        debug!("Path tool: {} -> {}", before, after);
    }
    (session, effects)
}

fn idle_pointer_down(
    session: &mut Session,
    pointer: &Pointer,
    target: Option<&BezierShape>,
    is_double_click: bool,
    settings: &EditorSettings,
) -> (ToolMode, Vec<Effect>) {
    match target {
        Some(shape) if shape.edit_mode => {
            EditingSession::new(shape.clone()).pointer_down(pointer, is_double_click, settings)
        }
        Some(shape) if is_double_click => {
            info!("Entering edit mode on {}", shape.id);
            let editing = EditingSession::new(shape.clone());
            let effects = vec![Effect::UpdateShape {
                shape: editing.shape.clone(),
            }];
            (ToolMode::Editing(editing), effects)
        }
        Some(_) => (ToolMode::Idle, Vec::new()),
        None => {
            let id = session.allocate_id();
            let (creating, effects) = CreatingSession::start(id, pointer, settings);
            (ToolMode::Creating(creating), effects)
        }
    }
}

/// Mutable wrapper around [`transition`] for host adapters
#[derive(Debug, Clone, Default)]
pub struct PathTool {
    pub session: Session,
    pub settings: EditorSettings,
}

impl PathTool {
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            session: Session::default(),
            settings,
        }
    }

    /// Feed one event, returning the effects for the host
    pub fn handle(&mut self, event: &InputEvent) -> Vec<Effect> {
        let session = mem::take(&mut self.session);
        let (session, effects) = transition(session, event, &self.settings);
        self.session = session;
        effects
    }

    pub fn mode(&self) -> &ToolMode {
        &self.session.mode
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.session.mode, ToolMode::Idle)
    }
}
