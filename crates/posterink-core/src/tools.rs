//! Tool selection and freehand path capture.

use crate::element::{
    BrushKind, ElementContent, ElementKind, ElementSpec, ElementStyle, Geometry, Rgba,
    StrokeContent,
};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Available editor tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolKind {
    #[default]
    Select,
    Draw,
}

/// Normalized coordinate range for captured stroke points.
pub const NORM_MAX: f64 = 100.0;
/// Minimum bounding-box dimension used for normalization, to avoid division
/// by zero on degenerate strokes.
const MIN_NORM_BOX: f64 = 1.0;

/// Stroke appearance applied to the next captured path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrushSettings {
    pub color: Rgba,
    pub width: f64,
    pub kind: BrushKind,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            color: Rgba::black(),
            width: 3.0,
            kind: BrushKind::Pen,
        }
    }
}

/// Accumulates raw pointer samples for the draw tool.
///
/// A capture lives for exactly one pointer press: `begin` on pointer-down,
/// `update` on each move, `finish` on pointer-up. Finishing with fewer than
/// two samples discards the stroke; that is a policy, not an error.
#[derive(Debug, Clone, Default)]
pub struct PathCapture {
    samples: Vec<Point>,
    active: bool,
}

impl PathCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Start a capture, seeded with the first canvas-space point.
    pub fn begin(&mut self, point: Point) {
        self.samples.clear();
        self.samples.push(point);
        self.active = true;
    }

    /// Append a canvas-space sample while the pointer button is held.
    pub fn update(&mut self, point: Point) {
        if self.active {
            self.samples.push(point);
        }
    }

    /// Discard the capture without creating an element.
    pub fn cancel(&mut self) {
        self.samples.clear();
        self.active = false;
    }

    /// Finish the capture, producing a draw-element spec.
    ///
    /// The element's geometry is the axis-aligned bounding box of the
    /// samples; its content carries the points normalized to 0–100 per axis
    /// plus a snapshot of the brush settings. Returns `None` when fewer than
    /// two samples were collected.
    pub fn finish(&mut self, brush: &BrushSettings) -> Option<ElementSpec> {
        let samples = std::mem::take(&mut self.samples);
        self.active = false;
        if samples.len() < 2 {
            return None;
        }

        let bbox = sample_bounds(&samples);
        let points = normalize_points(&samples, bbox);

        let style = ElementStyle {
            stroke: brush.color,
            stroke_width: brush.width,
            ..ElementStyle::default()
        };
        Some(ElementSpec {
            kind: ElementKind::Draw,
            sub_kind: None,
            geometry: Some(Geometry::from_rect(bbox)),
            style: Some(style),
            content: Some(ElementContent::Stroke(StrokeContent {
                points,
                color: brush.color,
                width: brush.width,
                brush: brush.kind,
            })),
        })
    }
}

/// Axis-aligned bounding box of a non-empty sample list.
fn sample_bounds(samples: &[Point]) -> Rect {
    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::MIN;
    let mut max_y = f64::MIN;
    for point in samples {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }
    Rect::new(min_x, min_y, max_x, max_y)
}

/// Normalize samples into the 0–100 range per axis relative to `bbox`.
pub fn normalize_points(samples: &[Point], bbox: Rect) -> Vec<Point> {
    let box_w = bbox.width().max(MIN_NORM_BOX);
    let box_h = bbox.height().max(MIN_NORM_BOX);
    samples
        .iter()
        .map(|p| {
            Point::new(
                (p.x - bbox.x0) / box_w * NORM_MAX,
                (p.y - bbox.y0) / box_h * NORM_MAX,
            )
        })
        .collect()
}

/// Map normalized 0–100 points into a target box, reproducing the stroke at
/// the box's current scale. Stroke width is not scaled; it renders at
/// constant on-screen thickness.
pub fn denormalize_points(points: &[Point], target: Rect) -> Vec<Point> {
    points
        .iter()
        .map(|p| {
            Point::new(
                target.x0 + p.x / NORM_MAX * target.width(),
                target.y0 + p.y / NORM_MAX * target.height(),
            )
        })
        .collect()
}
