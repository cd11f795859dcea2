//! Host input events
//!
//! Events arrive from the host adapter already decoded: page-space
//! coordinates, the current zoom and modifier state, and a millisecond
//! timestamp. They serialize as tagged JSON so event scripts can be
//! replayed from files.

use crate::editing::shape::BezierShape;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Modifier keys held during an event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        alt: false,
        ctrl: false,
    };

    /// Shift snaps drag offsets to 45° steps
    pub fn constrain_angle(&self) -> bool {
        self.shift
    }

    /// Alt or ctrl moves one handle without mirroring the other
    pub fn break_symmetry(&self) -> bool {
        self.alt || self.ctrl
    }

    /// Alt-click on a segment inserts a point
    pub fn insert_on_segment(&self) -> bool {
        self.alt
    }

    /// Shift-click adds to or removes from the selection
    pub fn additive(&self) -> bool {
        self.shift
    }
}

fn default_zoom() -> f64 {
    1.0
}

/// Pointer state for pointer events
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pointer {
    /// Page-space position
    pub point: Point,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub time_ms: u64,
}

impl Pointer {
    pub fn new(x: f64, y: f64, time_ms: u64) -> Self {
        Self {
            point: Point::new(x, y),
            zoom: 1.0,
            modifiers: Modifiers::NONE,
            time_ms,
        }
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Keys the engine reacts to
///
/// Serialized as the key's name (`"Enter"`, `"Escape"`, `"Delete"`,
/// `"Backspace"`) or the single character typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Key {
    Enter,
    Escape,
    Delete,
    Backspace,
    Char(char),
    Other(String),
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        match name.as_str() {
            "Enter" => Key::Enter,
            "Escape" => Key::Escape,
            "Delete" => Key::Delete,
            "Backspace" => Key::Backspace,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Other(name),
                }
            }
        }
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        match key {
            Key::Enter => "Enter".to_string(),
            Key::Escape => "Escape".to_string(),
            Key::Delete => "Delete".to_string(),
            Key::Backspace => "Backspace".to_string(),
            Key::Char(c) => c.to_string(),
            Key::Other(name) => name,
        }
    }
}

impl Key {
    /// Either deletion key
    pub fn is_delete(&self) -> bool {
        matches!(self, Key::Delete | Key::Backspace)
    }

    /// The close-path shortcut, `c` in either case
    pub fn is_close(&self) -> bool {
        matches!(self, Key::Char('c') | Key::Char('C'))
    }
}

/// One input event from the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InputEvent {
    /// `target` is the shape the host found under the pointer, if any
    PointerDown {
        pointer: Pointer,
        #[serde(default)]
        target: Option<BezierShape>,
    },
    PointerMove {
        pointer: Pointer,
    },
    PointerUp {
        pointer: Pointer,
    },
    #[serde(rename_all = "camelCase")]
    KeyDown {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
        #[serde(default)]
        time_ms: u64,
    },
    /// A drag from the host's own handle system; `point` is page space
    HandleDrag {
        handle: String,
        point: Point,
        #[serde(default)]
        modifiers: Modifiers,
    },
    #[serde(rename_all = "camelCase")]
    Tick {
        time_ms: u64,
    },
}

impl InputEvent {
    pub fn pointer_down(pointer: Pointer) -> Self {
        InputEvent::PointerDown {
            pointer,
            target: None,
        }
    }

    pub fn key(key: Key, time_ms: u64) -> Self {
        InputEvent::KeyDown {
            key,
            modifiers: Modifiers::NONE,
            time_ms,
        }
    }

    /// Timestamp of the event, when it carries one
    pub fn time_ms(&self) -> Option<u64> {
        match self {
            InputEvent::PointerDown { pointer, .. }
            | InputEvent::PointerMove { pointer }
            | InputEvent::PointerUp { pointer } => Some(pointer.time_ms),
            InputEvent::KeyDown { time_ms, .. } | InputEvent::Tick { time_ms } => Some(*time_ms),
            InputEvent::HandleDrag { .. } => None,
        }
    }
}
