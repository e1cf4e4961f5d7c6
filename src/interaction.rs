//! Pointer events in viewport pixels -> snapped graph points.

use tracing::debug;

use crate::config::{Interaction, InteractionMode};
use crate::geometry::{snap_point, Point, View, Viewport};
use crate::session::{ActivitySession, ClickOutcome};

/// A press at `(x, y)` pixels from the top-left corner of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// False for every press when the viewport has no area.
    fn inside(&self, viewport: Viewport) -> bool {
        viewport.width > 0.0
            && viewport.height > 0.0
            && (0.0..=viewport.width).contains(&self.x)
            && (0.0..=viewport.height).contains(&self.y)
    }
}

/// Grid point under the pointer, or `None` if the nearest grid point is
/// farther than `hit_radius_px` from the press.
pub fn snap_click(
    view: &View,
    viewport: Viewport,
    interaction: &Interaction,
    event: PointerEvent,
) -> Option<Point> {
    let (gx, gy) = view.to_graph(viewport, event.x, event.y);
    let snapped = snap_point(gx, gy, interaction.snap_step);

    let (sx, sy) = view.to_pixel(viewport, snapped);
    let dist = (event.x - sx).hypot(event.y - sy);
    if dist.is_nan() || dist > interaction.hit_radius_px {
        debug!(
            dist,
            hit_radius_px = interaction.hit_radius_px,
            point = %snapped,
            "click too far from grid point"
        );
        return None;
    }
    Some(snapped)
}

impl ActivitySession {
    /// Handle a press on the graph according to the configured mode.
    pub fn click(&mut self, event: PointerEvent, viewport: Viewport) -> ClickOutcome {
        let mode = &self.config().interaction.mode;
        if *mode != InteractionMode::PlacePoints {
            debug!(?mode, "interaction mode does not place points");
            return ClickOutcome::UnsupportedMode;
        }
        self.place_point(event, viewport)
    }

    fn place_point(&mut self, event: PointerEvent, viewport: Viewport) -> ClickOutcome {
        if !event.inside(viewport) {
            return ClickOutcome::OutsideViewport;
        }
        if self.is_full() {
            debug!("activity full, click ignored");
            return ClickOutcome::Full;
        }
        match snap_click(self.view(), viewport, &self.config().interaction, event) {
            Some(p) => self.add_point(p),
            None => ClickOutcome::OutsideHitRadius,
        }
    }
}
