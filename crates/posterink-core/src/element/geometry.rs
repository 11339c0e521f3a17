//! Element geometry: position, size, rotation and mirroring.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Minimum width/height of any element, in canvas units.
pub const MIN_ELEMENT_SIZE: f64 = 10.0;

/// Placement of an element on the canvas.
///
/// `x`/`y` is the top-left corner in canvas units. Rendering applies the
/// rotation (about the center) before the flip mirroring; handle positions
/// depend on that order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// Rotation in degrees, clockwise.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub flip_x: bool,
    #[serde(default)]
    pub flip_y: bool,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(0.0, 0.0, 100.0, 100.0)
    }
}

impl Geometry {
    /// Create a new geometry. Width and height are clamped to the minimum
    /// element size.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            x,
            y,
            w: w.max(MIN_ELEMENT_SIZE),
            h: h.max(MIN_ELEMENT_SIZE),
            rotation: 0.0,
            flip_x: false,
            flip_y: false,
        }
    }

    /// Build a geometry from an arbitrary rectangle, clamping the size.
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }

    /// The axis-aligned bounding box (ignoring rotation).
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.w, self.y + self.h)
    }

    /// Center of the element.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Resize in place, keeping the top-left corner and clamping the size.
    pub fn set_size(&mut self, w: f64, h: f64) {
        self.w = w.max(MIN_ELEMENT_SIZE);
        self.h = h.max(MIN_ELEMENT_SIZE);
    }

    /// Mirror across the vertical axis. Position and size are untouched.
    pub fn toggle_flip_x(&mut self) {
        self.flip_x = !self.flip_x;
    }

    /// Mirror across the horizontal axis. Position and size are untouched.
    pub fn toggle_flip_y(&mut self) {
        self.flip_y = !self.flip_y;
    }

    /// Whether a canvas-space point falls inside the bounding box.
    pub fn contains(&self, point: Point) -> bool {
        self.bounds().contains(point)
    }
}
