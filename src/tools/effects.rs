//! Effects the engine asks the host to carry out

use crate::editing::shape::{BezierShape, ShapeId};
use kurbo::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Effect {
    CreateShape {
        shape: BezierShape,
    },
    UpdateShape {
        shape: BezierShape,
    },
    DeleteShape {
        id: ShapeId,
    },
    /// Live preview of the next point while drawing; `None` clears it
    #[serde(rename_all = "camelCase")]
    Preview {
        shape_id: ShapeId,
        point: Option<Point>,
        snapped: bool,
    },
    /// Re-select the shape after `delay_ms` so the renderer refreshes
    #[serde(rename_all = "camelCase")]
    RefreshSelection { shape_id: ShapeId, delay_ms: u64 },
    /// Send a `tick` event after `delay_ms`
    #[serde(rename_all = "camelCase")]
    ScheduleTick { delay_ms: u64 },
}

impl Effect {
    /// The shape carried by a create or update
    pub fn shape(&self) -> Option<&BezierShape> {
        match self {
            Effect::CreateShape { shape } | Effect::UpdateShape { shape } => Some(shape),
            _ => None,
        }
    }
}

/// Refresh requests for every configured delay
pub fn refresh_effects<'a>(
    shape_id: &ShapeId,
    delays_ms: &'a [u64],
) -> impl Iterator<Item = Effect> + 'a {
    let shape_id = shape_id.clone();
    delays_ms.iter().map(move |&delay_ms| Effect::RefreshSelection {
        shape_id: shape_id.clone(),
        delay_ms,
    })
}
