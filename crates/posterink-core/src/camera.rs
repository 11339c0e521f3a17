//! View state: zoom percentage and pan offset.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom level shown as "100%" in the UI.
pub const DEFAULT_ZOOM_PERCENT: f64 = 100.0;
/// Zoom clamp range, in percent.
pub const MIN_ZOOM_PERCENT: f64 = 10.0;
pub const MAX_ZOOM_PERCENT: f64 = 400.0;

/// Camera mapping between screen pixels and canvas units.
///
/// Screen = canvas * (zoom/100) + offset. Pointer deltas divide by the zoom
/// factor so dragging stays 1:1 with the canvas at any magnification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Current zoom in percent (100 = 1:1).
    pub zoom_percent: f64,
    /// Screen-space translation of the canvas origin.
    pub offset: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            zoom_percent: DEFAULT_ZOOM_PERCENT,
            offset: Vec2::ZERO,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// The zoom as a scale factor (100% -> 1.0).
    pub fn scale(&self) -> f64 {
        self.zoom_percent / 100.0
    }

    /// Set the zoom, clamped to the allowed range.
    pub fn set_zoom(&mut self, percent: f64) {
        self.zoom_percent = percent.clamp(MIN_ZOOM_PERCENT, MAX_ZOOM_PERCENT);
    }

    /// Zoom while keeping the given screen point fixed on the canvas.
    pub fn zoom_at(&mut self, screen_point: Point, percent: f64) {
        let anchor = self.screen_to_canvas(screen_point);
        self.set_zoom(percent);
        let moved = self.canvas_to_screen(anchor);
        self.offset += Vec2::new(screen_point.x - moved.x, screen_point.y - moved.y);
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        let scale = self.scale();
        Point::new(
            (screen.x - self.offset.x) / scale,
            (screen.y - self.offset.y) / scale,
        )
    }

    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        let scale = self.scale();
        Point::new(
            canvas.x * scale + self.offset.x,
            canvas.y * scale + self.offset.y,
        )
    }

    /// Convert a screen-space pointer delta into canvas units.
    pub fn screen_delta_to_canvas(&self, delta: Vec2) -> Vec2 {
        let scale = self.scale();
        Vec2::new(delta.x / scale, delta.y / scale)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
