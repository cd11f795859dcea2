//! Double-click detection from pointer-down time and distance

use crate::core::config::settings::DoubleClickSettings;
use crate::geometry::utilities::local_threshold;
use kurbo::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Click {
    point: Point,
    time_ms: u64,
}

/// Remembers the last click
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClickTracker {
    last: Option<Click>,
}

impl ClickTracker {
    /// Record a pointer-down and report whether it completes a double-click
    ///
    /// A detected double-click clears the tracker, so the third click of
    /// a triple-click starts a new pair.
    pub fn register(
        &mut self,
        point: Point,
        time_ms: u64,
        zoom: f64,
        settings: &DoubleClickSettings,
    ) -> bool {
        let max_distance = local_threshold(settings.max_distance_px, zoom);
        let is_double = self.last.is_some_and(|last| {
            time_ms
                .checked_sub(last.time_ms)
                .is_some_and(|dt| dt <= settings.max_interval_ms)
                && last.point.distance(point) <= max_distance
        });

        self.last = if is_double {
            None
        } else {
            Some(Click { point, time_ms })
        };
        is_double
    }
}
