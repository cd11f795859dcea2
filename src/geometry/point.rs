//! Anchor points and handle identifiers
//!
//! An anchor is a user-placed vertex with optional incoming (`cp1`) and
//! outgoing (`cp2`) control points. Everything that edits a path talks
//! about its points through these types.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A vertex of a path, with optional control points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorPoint {
    pub x: f64,
    pub y: f64,
    /// Incoming control point (tangent from the previous point)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cp1: Option<Point>,
    /// Outgoing control point (tangent toward the next point)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cp2: Option<Point>,
}

impl AnchorPoint {
    /// Create a corner point
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            cp1: None,
            cp2: None,
        }
    }

    pub fn from_point(p: Point) -> Self {
        Self::new(p.x, p.y)
    }

    pub fn with_cp1(mut self, cp1: Point) -> Self {
        self.cp1 = Some(cp1);
        self
    }

    pub fn with_cp2(mut self, cp2: Point) -> Self {
        self.cp2 = Some(cp2);
        self
    }

    /// Anchor position as a kurbo point
    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_pos(&mut self, p: Point) {
        self.x = p.x;
        self.y = p.y;
    }

    /// A corner point has no control points
    pub fn is_corner(&self) -> bool {
        self.cp1.is_none() && self.cp2.is_none()
    }

    pub fn is_smooth(&self) -> bool {
        !self.is_corner()
    }

    pub fn point_type(&self) -> PointType {
        if self.is_corner() {
            PointType::Corner
        } else {
            PointType::Smooth
        }
    }

    /// Position of the given handle, if the point has it
    pub fn handle(&self, kind: HandleKind) -> Option<Point> {
        match kind {
            HandleKind::Anchor => Some(self.pos()),
            HandleKind::Cp1 => self.cp1,
            HandleKind::Cp2 => self.cp2,
        }
    }

    /// Move the anchor and its control points rigidly
    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
        self.cp1 = self.cp1.map(|cp| cp + delta);
        self.cp2 = self.cp2.map(|cp| cp + delta);
    }

    /// Drop both control points
    pub fn make_corner(&mut self) {
        self.cp1 = None;
        self.cp2 = None;
    }

    /// Anchor plus any control points, for bounds of degenerate paths
    pub fn all_points(&self) -> impl Iterator<Item = Point> {
        std::iter::once(self.pos())
            .chain(self.cp1)
            .chain(self.cp2)
    }
}

/// Whether a point joins its segments with a corner or a curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointType {
    Corner,
    Smooth,
}

/// Which part of a point a handle refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HandleKind {
    Anchor,
    Cp1,
    Cp2,
}

impl HandleKind {
    /// The control point on the other side of the anchor
    pub fn opposite(&self) -> Option<HandleKind> {
        match self {
            HandleKind::Anchor => None,
            HandleKind::Cp1 => Some(HandleKind::Cp2),
            HandleKind::Cp2 => Some(HandleKind::Cp1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HandleKind::Anchor => "anchor",
            HandleKind::Cp1 => "cp1",
            HandleKind::Cp2 => "cp2",
        }
    }
}

/// Identifies one draggable handle of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleId {
    pub point_index: usize,
    pub kind: HandleKind,
}

impl HandleId {
    pub fn new(point_index: usize, kind: HandleKind) -> Self {
        Self { point_index, kind }
    }

    pub fn anchor(point_index: usize) -> Self {
        Self::new(point_index, HandleKind::Anchor)
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.point_index, self.kind.as_str())
    }
}

/// Error for host handle identifiers that don't name a handle
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed handle identifier {0:?}")]
pub struct MalformedHandleId(pub String);

impl FromStr for HandleId {
    type Err = MalformedHandleId;

    /// Accepts `"3"`, `"3:anchor"`, `"3:cp1"` and `"3:cp2"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || MalformedHandleId(s.to_string());
        let (index, kind) = match s.split_once(':') {
            Some((index, kind)) => (index, kind),
            None => (s, "anchor"),
        };
        let point_index = index.trim().parse::<usize>().map_err(|_| malformed())?;
        let kind = match kind.trim() {
            "anchor" => HandleKind::Anchor,
            "cp1" => HandleKind::Cp1,
            "cp2" => HandleKind::Cp2,
            _ => return Err(malformed()),
        };
        Ok(HandleId::new(point_index, kind))
    }
}
