//! Canvas element data model.

mod geometry;
mod style;

pub use geometry::{Geometry, MIN_ELEMENT_SIZE};
pub use style::{ElementStyle, Rgba};

use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for canvas elements.
///
/// UUIDv7 tokens are time-ordered, unique within a project and never reused.
pub type ElementId = Uuid;

/// Token shared by all members of a group.
pub type GroupId = Uuid;

/// The kind of content an element carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    Text,
    Shape,
    Image,
    Draw,
    BrandAsset,
}

impl Default for ElementKind {
    fn default() -> Self {
        ElementKind::Shape
    }
}

/// Brush variant recorded with a freehand stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BrushKind {
    #[default]
    Pen,
    Marker,
    Highlighter,
}

/// Captured freehand stroke data.
///
/// Points are normalized to a 0–100 range per axis relative to the stroke's
/// bounding box, so the element's geometry can be resized freely and the
/// stroke re-mapped into the new box. The stroke color, width and brush are
/// snapshots taken when the stroke was finished; width is rendered at
/// constant on-screen thickness regardless of box scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeContent {
    pub points: Vec<Point>,
    pub color: Rgba,
    pub width: f64,
    pub brush: BrushKind,
}

/// Payload of an element, varying by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementContent {
    /// Text elements: the displayed string.
    Text(String),
    /// Draw elements: the normalized stroke.
    Stroke(StrokeContent),
    /// Image and brand-asset elements: an opaque reference (URL or blob id).
    Image(String),
    /// Shapes carry no content beyond geometry and style.
    Empty,
}

/// A single element on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasElement {
    pub id: ElementId,
    pub kind: ElementKind,
    /// Optional refinement tag, e.g. the shape kind (`"rect"`, `"circle"`).
    #[serde(default)]
    pub sub_kind: Option<String>,
    pub geometry: Geometry,
    pub style: ElementStyle,
    pub content: ElementContent,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub group_id: Option<GroupId>,
}

fn default_true() -> bool {
    true
}

impl CanvasElement {
    /// Build an element from a creation spec, assigning a fresh id.
    pub fn from_spec(spec: ElementSpec) -> Self {
        let content = spec.content.unwrap_or(match spec.kind {
            ElementKind::Text => ElementContent::Text(String::new()),
            ElementKind::Image | ElementKind::BrandAsset => ElementContent::Image(String::new()),
            _ => ElementContent::Empty,
        });
        Self {
            id: Uuid::now_v7(),
            kind: spec.kind,
            sub_kind: spec.sub_kind,
            geometry: spec.geometry.unwrap_or_default(),
            style: spec.style.unwrap_or_default(),
            content,
            visible: true,
            locked: false,
            group_id: None,
        }
    }

    /// Whether the element can be hit by pointer interactions.
    pub fn is_interactive(&self) -> bool {
        self.visible && !self.locked
    }

    /// Human-readable label for the layer panel.
    pub fn label(&self) -> String {
        match (&self.content, &self.sub_kind) {
            (ElementContent::Text(text), _) if !text.is_empty() => {
                let mut label: String = text.chars().take(20).collect();
                if text.chars().count() > 20 {
                    label.push('…');
                }
                label
            }
            (_, Some(sub)) => sub.clone(),
            _ => match self.kind {
                ElementKind::Text => "Text".to_string(),
                ElementKind::Shape => "Shape".to_string(),
                ElementKind::Image => "Image".to_string(),
                ElementKind::Draw => "Drawing".to_string(),
                ElementKind::BrandAsset => "Brand asset".to_string(),
            },
        }
    }
}

/// What a palette, upload or capture source asks the store to create.
#[derive(Debug, Clone, Default)]
pub struct ElementSpec {
    pub kind: ElementKind,
    pub sub_kind: Option<String>,
    pub geometry: Option<Geometry>,
    pub style: Option<ElementStyle>,
    pub content: Option<ElementContent>,
}

impl ElementSpec {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::Text,
            content: Some(ElementContent::Text(content.into())),
            ..Default::default()
        }
    }

    pub fn shape(sub_kind: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::Shape,
            sub_kind: Some(sub_kind.into()),
            ..Default::default()
        }
    }

    pub fn image(reference: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::Image,
            content: Some(ElementContent::Image(reference.into())),
            ..Default::default()
        }
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_style(mut self, style: ElementStyle) -> Self {
        self.style = Some(style);
        self
    }
}

/// Partial update applied to an element.
///
/// Every field is optional; unset fields leave the element untouched.
/// Size and opacity values are clamped, not rejected.
#[derive(Debug, Clone, Default)]
pub struct ElementPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub w: Option<f64>,
    pub h: Option<f64>,
    pub rotation: Option<f64>,
    pub flip_x: Option<bool>,
    pub flip_y: Option<bool>,
    pub opacity: Option<f64>,
    pub fill: Option<Rgba>,
    pub stroke: Option<Rgba>,
    pub stroke_width: Option<f64>,
    pub corner_radius: Option<f64>,
    pub content: Option<ElementContent>,
    pub sub_kind: Option<String>,
}

impl ElementPatch {
    /// Patch that replaces the whole geometry.
    pub fn from_geometry(geometry: Geometry) -> Self {
        Self {
            x: Some(geometry.x),
            y: Some(geometry.y),
            w: Some(geometry.w),
            h: Some(geometry.h),
            rotation: Some(geometry.rotation),
            flip_x: Some(geometry.flip_x),
            flip_y: Some(geometry.flip_y),
            ..Default::default()
        }
    }

    /// Merge this patch into an element.
    pub fn apply(&self, element: &mut CanvasElement) {
        let geo = &mut element.geometry;
        if let Some(x) = self.x {
            geo.x = x;
        }
        if let Some(y) = self.y {
            geo.y = y;
        }
        if let Some(w) = self.w {
            geo.w = w.max(MIN_ELEMENT_SIZE);
        }
        if let Some(h) = self.h {
            geo.h = h.max(MIN_ELEMENT_SIZE);
        }
        if let Some(rotation) = self.rotation {
            geo.rotation = rotation;
        }
        if let Some(flip_x) = self.flip_x {
            geo.flip_x = flip_x;
        }
        if let Some(flip_y) = self.flip_y {
            geo.flip_y = flip_y;
        }
        if let Some(opacity) = self.opacity {
            element.style.set_opacity(opacity);
        }
        if let Some(fill) = self.fill {
            element.style.fill = fill;
        }
        if let Some(stroke) = self.stroke {
            element.style.stroke = stroke;
        }
        if let Some(stroke_width) = self.stroke_width {
            element.style.stroke_width = stroke_width.max(0.0);
        }
        if let Some(corner_radius) = self.corner_radius {
            element.style.corner_radius = corner_radius.max(0.0);
        }
        if let Some(content) = &self.content {
            element.content = content.clone();
        }
        if let Some(sub_kind) = &self.sub_kind {
            element.sub_kind = Some(sub_kind.clone());
        }
    }
}
