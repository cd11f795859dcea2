//! Editor settings
//!
//! All thresholds and tuning constants the engine uses live here. Pixel
//! values are screen pixels and get divided by the zoom level at use.
//! Every field has a default, so a settings file only needs to name what
//! it changes.

use serde::{Deserialize, Serialize};

/// Hit-test radii, in screen pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitTestSettings {
    pub anchor_radius_px: f64,
    pub control_radius_px: f64,
    pub segment_radius_px: f64,
}

impl Default for HitTestSettings {
    fn default() -> Self {
        Self {
            anchor_radius_px: 8.0,
            control_radius_px: 8.0,
            segment_radius_px: 6.0,
        }
    }
}

/// Settings for drawing new paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreationSettings {
    /// Drag distance that turns a freshly placed point into a smooth one
    pub drag_threshold_px: f64,
    /// Hover distance to the first point that snaps the preview onto it
    pub snap_threshold_px: f64,
    /// Distance from where snapping began needed to leave the snap zone
    pub release_threshold_px: f64,
    /// Clicking this close to the first point closes the path outright
    pub close_click_radius_px: f64,
    /// Padding around the stable-origin box while drawing
    pub creation_padding: f64,
    /// Padding around a lone first point
    pub single_point_padding: f64,
}

impl Default for CreationSettings {
    fn default() -> Self {
        Self {
            drag_threshold_px: 3.0,
            snap_threshold_px: 12.0,
            release_threshold_px: 24.0,
            close_click_radius_px: 8.0,
            creation_padding: 10.0,
            single_point_padding: 50.0,
        }
    }
}

/// Double-click detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoubleClickSettings {
    pub max_interval_ms: u64,
    pub max_distance_px: f64,
}

impl Default for DoubleClickSettings {
    fn default() -> Self {
        Self {
            max_interval_ms: 300,
            max_distance_px: 5.0,
        }
    }
}

/// Curve math tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveSettings {
    /// Split handle length as a fraction of the split segment's arc length
    pub split_handle_fraction: f64,
    /// Handle length (screen pixels) given to a corner turned smooth
    pub toggle_control_offset: f64,
    /// Minimum box change that triggers renormalization
    pub bounds_change_threshold: f64,
    /// Accuracy for arc length and projection
    pub accuracy: f64,
}

impl Default for CurveSettings {
    fn default() -> Self {
        Self {
            split_handle_fraction: 1.0 / 3.0,
            toggle_control_offset: 30.0,
            bounds_change_threshold: 0.01,
            accuracy: 1e-3,
        }
    }
}

/// Settings for editing existing paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditingSettings {
    /// Delay before an off-shape click leaves edit mode
    pub exit_grace_ms: u64,
    /// Deferred re-selections after a path is closed or completed
    pub refresh_delays_ms: Vec<u64>,
    /// Dragging a segment pulls its handles
    pub segment_drag: bool,
}

impl Default for EditingSettings {
    fn default() -> Self {
        Self {
            exit_grace_ms: 40,
            refresh_delays_ms: vec![16, 50],
            segment_drag: true,
        }
    }
}

/// All engine settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub hit_test: HitTestSettings,
    pub creation: CreationSettings,
    pub double_click: DoubleClickSettings,
    pub curve: CurveSettings,
    pub editing: EditingSettings,
}
