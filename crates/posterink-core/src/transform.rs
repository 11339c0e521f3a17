//! Pointer-driven transform engine: move and corner-resize drags, one-shot
//! alignment, and flip toggles.

use crate::element::{ElementId, Geometry, MIN_ELEMENT_SIZE};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Resize-handle hit radius in screen pixels (divide by the camera scale to
/// get canvas units).
pub const HANDLE_HIT_TOLERANCE: f64 = 8.0;

/// Corner handles of an element's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];
}

/// What an active drag is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Move,
    Resize(Corner),
}

/// An in-flight drag: exists only while the pointer button is held.
#[derive(Debug, Clone)]
pub struct DragSession {
    /// The element being transformed.
    pub element: ElementId,
    pub mode: DragMode,
    /// Pointer position at drag start, in screen pixels.
    pub anchor: Point,
    /// Geometry snapshot at drag start.
    pub start: Geometry,
}

/// Drag state machine: `Idle -> Dragging(mode) -> Idle`.
///
/// The engine is driven through an explicit `begin`/`update`/`end` API so
/// tests can exercise it without synthesizing real pointer events. It
/// computes geometry; committing the result to the store is the caller's
/// job.
#[derive(Debug, Clone, Default)]
pub struct TransformEngine {
    session: Option<DragSession>,
}

impl TransformEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Enter `Dragging(mode)`, snapshotting the element's geometry and the
    /// anchor pointer position.
    pub fn begin(&mut self, element: ElementId, mode: DragMode, anchor: Point, start: Geometry) {
        self.session = Some(DragSession {
            element,
            mode,
            anchor,
            start,
        });
    }

    /// Compute the geometry for the current pointer position.
    ///
    /// The screen-pixel delta from the anchor is divided by the zoom factor
    /// to get canvas units. The zoom is sampled at call time, not frozen at
    /// drag start, matching the original interaction behavior.
    ///
    /// Returns `None` when no drag is active.
    pub fn update(&self, pointer: Point, zoom_percent: f64) -> Option<Geometry> {
        let session = self.session.as_ref()?;
        let scale = (zoom_percent / 100.0).max(0.01);
        let delta = Vec2::new(
            (pointer.x - session.anchor.x) / scale,
            (pointer.y - session.anchor.y) / scale,
        );
        Some(match session.mode {
            DragMode::Move => moved_geometry(&session.start, delta),
            DragMode::Resize(corner) => resized_geometry(&session.start, corner, delta),
        })
    }

    /// Return to `Idle`. The caller has already flushed the last computed
    /// geometry into the store on every `update`.
    pub fn end(&mut self) -> Option<DragSession> {
        self.session.take()
    }

    /// Abort the drag, returning the start snapshot so the caller can
    /// restore it.
    pub fn cancel(&mut self) -> Option<Geometry> {
        self.session.take().map(|s| s.start)
    }
}

/// Translate a geometry by a canvas-space delta.
pub fn moved_geometry(start: &Geometry, delta: Vec2) -> Geometry {
    let mut geo = *start;
    geo.x = start.x + delta.x;
    geo.y = start.y + delta.y;
    geo
}

/// Resize from a corner handle by a canvas-space delta.
///
/// The corner diagonally opposite the dragged handle stays fixed in canvas
/// space: when a left or top edge moves, x or y compensates for the size
/// clamp so the far edge does not shift. Sizes clamp at the element minimum.
pub fn resized_geometry(start: &Geometry, corner: Corner, delta: Vec2) -> Geometry {
    let mut geo = *start;
    match corner {
        Corner::BottomRight => {
            geo.w = (start.w + delta.x).max(MIN_ELEMENT_SIZE);
            geo.h = (start.h + delta.y).max(MIN_ELEMENT_SIZE);
        }
        Corner::BottomLeft => {
            geo.w = (start.w - delta.x).max(MIN_ELEMENT_SIZE);
            geo.x = start.x + (start.w - geo.w);
            geo.h = (start.h + delta.y).max(MIN_ELEMENT_SIZE);
        }
        Corner::TopRight => {
            geo.w = (start.w + delta.x).max(MIN_ELEMENT_SIZE);
            geo.h = (start.h - delta.y).max(MIN_ELEMENT_SIZE);
            geo.y = start.y + (start.h - geo.h);
        }
        Corner::TopLeft => {
            geo.w = (start.w - delta.x).max(MIN_ELEMENT_SIZE);
            geo.x = start.x + (start.w - geo.w);
            geo.h = (start.h - delta.y).max(MIN_ELEMENT_SIZE);
            geo.y = start.y + (start.h - geo.h);
        }
    }
    geo
}

/// Position of a corner handle in canvas space.
pub fn corner_position(geometry: &Geometry, corner: Corner) -> Point {
    let bounds = geometry.bounds();
    match corner {
        Corner::TopLeft => Point::new(bounds.x0, bounds.y0),
        Corner::TopRight => Point::new(bounds.x1, bounds.y0),
        Corner::BottomLeft => Point::new(bounds.x0, bounds.y1),
        Corner::BottomRight => Point::new(bounds.x1, bounds.y1),
    }
}

/// Find the corner handle under a canvas-space point, if any.
pub fn hit_corner(geometry: &Geometry, point: Point, tolerance: f64) -> Option<Corner> {
    Corner::ALL.into_iter().find(|&corner| {
        let pos = corner_position(geometry, corner);
        let dx = point.x - pos.x;
        let dy = point.y - pos.y;
        dx * dx + dy * dy <= tolerance * tolerance
    })
}

/// One-shot alignment commands against the fixed canvas bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    CenterH,
    Right,
    Top,
    CenterV,
    Bottom,
}

/// Align a geometry within a canvas of the given size.
///
/// Horizontal variants recompute only `x`; vertical variants only `y`.
/// Size is never touched, so repeating a command is idempotent.
pub fn aligned_geometry(start: &Geometry, align: Align, canvas_w: f64, canvas_h: f64) -> Geometry {
    let mut geo = *start;
    match align {
        Align::Left => geo.x = 0.0,
        Align::CenterH => geo.x = (canvas_w - geo.w) / 2.0,
        Align::Right => geo.x = canvas_w - geo.w,
        Align::Top => geo.y = 0.0,
        Align::CenterV => geo.y = (canvas_h - geo.h) / 2.0,
        Align::Bottom => geo.y = canvas_h - geo.h,
    }
    geo
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn start() -> Geometry {
        Geometry::new(100.0, 100.0, 200.0, 100.0)
    }

    #[test]
    fn test_move_drag() {
        let geo = moved_geometry(&start(), Vec2::new(15.0, -40.0));
        assert!((geo.x - 115.0).abs() < f64::EPSILON);
        assert!((geo.y - 60.0).abs() < f64::EPSILON);
        assert!((geo.w - 200.0).abs() < f64::EPSILON);
        assert!((geo.h - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_bottom_right() {
        // Scenario: +50,+30 at 100% zoom grows width and height in place.
        let geo = resized_geometry(&start(), Corner::BottomRight, Vec2::new(50.0, 30.0));
        assert!((geo.x - 100.0).abs() < f64::EPSILON);
        assert!((geo.y - 100.0).abs() < f64::EPSILON);
        assert!((geo.w - 250.0).abs() < f64::EPSILON);
        assert!((geo.h - 130.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_top_left_clamps_and_compensates() {
        // Dragging the top-left corner past the far edge clamps the width at
        // the minimum while keeping the bottom-right corner fixed.
        let geo = resized_geometry(&start(), Corner::TopLeft, Vec2::new(220.0, 10.0));
        assert!((geo.w - 10.0).abs() < f64::EPSILON);
        assert!((geo.x - 290.0).abs() < f64::EPSILON);
        assert!((geo.h - 90.0).abs() < f64::EPSILON);
        assert!((geo.y - 110.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_opposite_corner_stays_fixed() {
        let s = start();
        for corner in Corner::ALL {
            let geo = resized_geometry(&s, corner, Vec2::new(37.0, -13.0));
            let (fixed_before, fixed_after) = match corner {
                Corner::TopLeft => (
                    corner_position(&s, Corner::BottomRight),
                    corner_position(&geo, Corner::BottomRight),
                ),
                Corner::TopRight => (
                    corner_position(&s, Corner::BottomLeft),
                    corner_position(&geo, Corner::BottomLeft),
                ),
                Corner::BottomLeft => (
                    corner_position(&s, Corner::TopRight),
                    corner_position(&geo, Corner::TopRight),
                ),
                Corner::BottomRight => (
                    corner_position(&s, Corner::TopLeft),
                    corner_position(&geo, Corner::TopLeft),
                ),
            };
            assert!((fixed_before.x - fixed_after.x).abs() < 1e-9);
            assert!((fixed_before.y - fixed_after.y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_resize_never_below_minimum() {
        for corner in Corner::ALL {
            for delta in [
                Vec2::new(-1000.0, -1000.0),
                Vec2::new(1000.0, 1000.0),
                Vec2::new(-195.0, 99.0),
            ] {
                let geo = resized_geometry(&start(), corner, delta);
                assert!(geo.w >= MIN_ELEMENT_SIZE);
                assert!(geo.h >= MIN_ELEMENT_SIZE);
            }
        }
    }

    #[test]
    fn test_engine_lifecycle() {
        let mut engine = TransformEngine::new();
        assert!(!engine.is_dragging());
        assert!(engine.update(Point::new(0.0, 0.0), 100.0).is_none());

        let id = Uuid::now_v7();
        engine.begin(
            id,
            DragMode::Resize(Corner::BottomRight),
            Point::new(300.0, 200.0),
            start(),
        );
        assert!(engine.is_dragging());

        let geo = engine.update(Point::new(350.0, 230.0), 100.0).unwrap();
        assert!((geo.w - 250.0).abs() < f64::EPSILON);
        assert!((geo.h - 130.0).abs() < f64::EPSILON);

        let session = engine.end().unwrap();
        assert_eq!(session.element, id);
        assert!(!engine.is_dragging());
    }

    #[test]
    fn test_zoom_scales_screen_delta() {
        let mut engine = TransformEngine::new();
        engine.begin(
            Uuid::now_v7(),
            DragMode::Move,
            Point::new(0.0, 0.0),
            start(),
        );
        // 100 screen pixels at 200% zoom is 50 canvas units.
        let geo = engine.update(Point::new(100.0, 0.0), 200.0).unwrap();
        assert!((geo.x - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cancel_returns_snapshot() {
        let mut engine = TransformEngine::new();
        let s = start();
        engine.begin(Uuid::now_v7(), DragMode::Move, Point::ZERO, s);
        let restored = engine.cancel().unwrap();
        assert_eq!(restored, s);
        assert!(!engine.is_dragging());
    }

    #[test]
    fn test_align_recomputes_single_axis() {
        let s = start();
        let (cw, ch) = (800.0, 600.0);

        let left = aligned_geometry(&s, Align::Left, cw, ch);
        assert!(left.x.abs() < f64::EPSILON);
        assert!((left.y - s.y).abs() < f64::EPSILON);

        let center = aligned_geometry(&s, Align::CenterH, cw, ch);
        assert!((center.x - 300.0).abs() < f64::EPSILON);

        let bottom = aligned_geometry(&s, Align::Bottom, cw, ch);
        assert!((bottom.y - 500.0).abs() < f64::EPSILON);
        assert!((bottom.x - s.x).abs() < f64::EPSILON);

        // Never touches size.
        assert!((center.w - s.w).abs() < f64::EPSILON);
        assert!((bottom.h - s.h).abs() < f64::EPSILON);
    }

    #[test]
    fn test_align_idempotent() {
        let s = start();
        let once = aligned_geometry(&s, Align::Left, 800.0, 600.0);
        let twice = aligned_geometry(&once, Align::Left, 800.0, 600.0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_hit_corner() {
        let geo = start();
        assert_eq!(
            hit_corner(&geo, Point::new(101.0, 99.0), 5.0),
            Some(Corner::TopLeft)
        );
        assert_eq!(
            hit_corner(&geo, Point::new(300.0, 200.0), 5.0),
            Some(Corner::BottomRight)
        );
        assert_eq!(hit_corner(&geo, Point::new(200.0, 150.0), 5.0), None);
    }
}
