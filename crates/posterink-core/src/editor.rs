//! Editor runtime: routes pointer events to the transform engine and path
//! capture, and ties the store, selection, layers and project session
//! together.
//!
//! Everything here runs synchronously inside an event callback; mutations
//! apply in event-firing order and never interleave.

use crate::camera::Camera;
use crate::element::{ElementId, ElementPatch, ElementSpec, GroupId, Rgba};
use crate::layers::{LayerManager, PendingDelete};
use crate::project::{ProjectSession, SessionError};
use crate::selection::Selection;
use crate::storage::KvStore;
use crate::store::{ElementStore, Reorder};
use crate::tools::{BrushSettings, PathCapture, ToolKind};
use crate::transform::{
    aligned_geometry, hit_corner, Align, DragMode, TransformEngine, HANDLE_HIT_TOLERANCE,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Modifier-key state accompanying a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Whether this modifier combination means "toggle selection".
    pub fn multi_select(&self) -> bool {
        self.shift || self.ctrl || self.meta
    }
}

/// Watermark placement for exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WatermarkPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
    Center,
    Custom,
}

/// Export file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
}

/// Export configuration supplied by the export dialog; consumed read-only
/// by rendering, never by editing state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSettings {
    pub watermark_text: String,
    pub watermark_color: Rgba,
    pub watermark_opacity: f64,
    pub position: WatermarkPosition,
    pub custom_x: f64,
    pub custom_y: f64,
    pub format: ExportFormat,
    pub quality: f64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            watermark_text: String::new(),
            watermark_color: Rgba::white(),
            watermark_opacity: 50.0,
            position: WatermarkPosition::default(),
            custom_x: 0.0,
            custom_y: 0.0,
            format: ExportFormat::default(),
            quality: 0.92,
        }
    }
}

/// The scene-editing engine.
pub struct Editor {
    pub store: ElementStore,
    pub selection: Selection,
    pub layers: LayerManager,
    pub camera: Camera,
    pub transform: TransformEngine,
    pub capture: PathCapture,
    pub tool: ToolKind,
    pub brush: BrushSettings,
    pub export: ExportSettings,
    session: ProjectSession,
}

impl Editor {
    /// Create an editor with a fresh default project backed by the given
    /// store.
    pub fn new(kv: Box<dyn KvStore>) -> Self {
        Self {
            store: ElementStore::new(),
            selection: Selection::new(),
            layers: LayerManager::new(),
            camera: Camera::new(),
            transform: TransformEngine::new(),
            capture: PathCapture::new(),
            tool: ToolKind::default(),
            brush: BrushSettings::default(),
            export: ExportSettings::default(),
            session: ProjectSession::new(kv),
        }
    }

    pub fn session(&self) -> &ProjectSession {
        &self.session
    }

    /// Current canvas size in canvas units.
    pub fn canvas_size(&self) -> (f64, f64) {
        let project = self.session.current();
        (project.width, project.height)
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tool = tool;
        self.capture.cancel();
    }

    // ----- pointer routing ------------------------------------------------

    /// Pointer-button press at a screen position.
    pub fn pointer_down(&mut self, screen: Point, modifiers: Modifiers) {
        let canvas_point = self.camera.screen_to_canvas(screen);
        match self.tool {
            ToolKind::Draw => self.capture.begin(canvas_point),
            ToolKind::Select => self.select_pointer_down(screen, canvas_point, modifiers),
        }
    }

    fn select_pointer_down(&mut self, screen: Point, canvas_point: Point, modifiers: Modifiers) {
        // A corner handle of the primary selection wins over element bodies.
        if let Some(primary) = self.selection.primary() {
            if let Some(element) = self.store.get(primary) {
                if element.is_interactive() {
                    let tolerance = HANDLE_HIT_TOLERANCE / self.camera.scale();
                    if let Some(corner) = hit_corner(&element.geometry, canvas_point, tolerance) {
                        self.transform.begin(
                            primary,
                            DragMode::Resize(corner),
                            screen,
                            element.geometry,
                        );
                        return;
                    }
                }
            }
        }

        match self.store.topmost_at(canvas_point) {
            Some(id) => {
                if modifiers.multi_select() {
                    self.selection.toggle(id);
                } else {
                    self.selection.click(id);
                    if let Some(element) = self.store.get(id) {
                        self.transform
                            .begin(id, DragMode::Move, screen, element.geometry);
                    }
                }
            }
            None => self.selection.clear(),
        }
    }

    /// Pointer movement while the button is held. No-op outside an active
    /// capture or drag session.
    pub fn pointer_move(&mut self, screen: Point) {
        if self.capture.is_active() {
            let canvas_point = self.camera.screen_to_canvas(screen);
            self.capture.update(canvas_point);
            return;
        }

        let Some(session) = self.transform.session() else {
            return;
        };
        let id = session.element;
        if let Some(geometry) = self.transform.update(screen, self.camera.zoom_percent) {
            if self.store.get(id).map(|e| e.geometry) != Some(geometry) {
                self.store.update(id, &ElementPatch::from_geometry(geometry));
                self.session.mark_dirty();
            }
        }
    }

    /// Pointer-button release: finish the stroke or close the drag session.
    pub fn pointer_up(&mut self, screen: Point) {
        if self.capture.is_active() {
            if let Some(spec) = self.capture.finish(&self.brush) {
                let id = self.store.add(spec);
                self.selection.click(id);
                self.session.mark_dirty();
            }
            return;
        }

        // The last pointer-move already flushed its geometry; apply the
        // release position and drop the session.
        self.pointer_move(screen);
        self.transform.end();
    }

    /// Pointer left the canvas: the drag session cannot outlive it.
    pub fn pointer_leave(&mut self) {
        if self.capture.is_active() {
            if let Some(spec) = self.capture.finish(&self.brush) {
                let id = self.store.add(spec);
                self.selection.click(id);
                self.session.mark_dirty();
            }
        }
        self.transform.end();
    }

    // ----- commands -------------------------------------------------------

    /// Add an element from a palette/upload spec; it becomes topmost and the
    /// sole selection.
    pub fn add_element(&mut self, spec: ElementSpec) -> ElementId {
        let id = self.store.add(spec);
        self.selection.click(id);
        self.session.mark_dirty();
        id
    }

    /// Add an image element from an upload reference.
    pub fn add_image(&mut self, reference: impl Into<String>) -> ElementId {
        self.add_element(ElementSpec::image(reference))
    }

    /// Apply a property-panel patch to the primary selection.
    pub fn update_primary(&mut self, patch: ElementPatch) {
        let Some(primary) = self.selection.primary() else {
            return;
        };
        self.store.update(primary, &patch);
        self.session.mark_dirty();
    }

    /// Align every selected element against the canvas bounds.
    pub fn align(&mut self, align: Align) {
        if self.selection.is_empty() {
            return;
        }
        let (canvas_w, canvas_h) = self.canvas_size();
        let ids: Vec<ElementId> = self.selection.ids().to_vec();
        for id in ids {
            let Some(element) = self.store.get(id) else {
                continue;
            };
            let geometry = aligned_geometry(&element.geometry, align, canvas_w, canvas_h);
            self.store.update(id, &ElementPatch::from_geometry(geometry));
        }
        self.session.mark_dirty();
    }

    /// Mirror the primary selection across the vertical axis. Placement and
    /// size are untouched.
    pub fn flip_horizontal(&mut self) {
        let Some(primary) = self.selection.primary() else {
            return;
        };
        let Some(element) = self.store.get(primary) else {
            return;
        };
        let patch = ElementPatch {
            flip_x: Some(!element.geometry.flip_x),
            ..Default::default()
        };
        self.store.update(primary, &patch);
        self.session.mark_dirty();
    }

    /// Mirror the primary selection across the horizontal axis.
    pub fn flip_vertical(&mut self) {
        let Some(primary) = self.selection.primary() else {
            return;
        };
        let Some(element) = self.store.get(primary) else {
            return;
        };
        let patch = ElementPatch {
            flip_y: Some(!element.geometry.flip_y),
            ..Default::default()
        };
        self.store.update(primary, &patch);
        self.session.mark_dirty();
    }

    /// Change the z-order of an element.
    pub fn reorder(&mut self, id: ElementId, command: Reorder) {
        self.store.reorder(id, command);
        self.session.mark_dirty();
    }

    pub fn toggle_visible(&mut self, id: ElementId) {
        self.layers.toggle_visible(&mut self.store, id);
        self.session.mark_dirty();
    }

    pub fn toggle_locked(&mut self, id: ElementId) {
        self.layers.toggle_locked(&mut self.store, id);
        self.session.mark_dirty();
    }

    /// Group the layer panel's multi-selection.
    pub fn group(&mut self) -> Option<GroupId> {
        let token = self.layers.group(&mut self.store)?;
        self.session.mark_dirty();
        Some(token)
    }

    /// Ungroup the layer panel's multi-selection.
    pub fn ungroup(&mut self) {
        self.layers.ungroup(&mut self.store);
        self.session.mark_dirty();
    }

    /// Begin a confirmation-gated element delete.
    pub fn request_delete(&self, id: ElementId) -> Option<PendingDelete> {
        self.layers.request_delete(&self.store, id)
    }

    /// Carry out a confirmed delete, clearing the id from all selection
    /// state.
    pub fn confirm_delete(&mut self, pending: PendingDelete) {
        let id = pending.confirm(&mut self.store);
        self.selection.forget(id);
        self.layers.forget(id);
        self.session.mark_dirty();
    }

    // ----- project lifecycle ---------------------------------------------

    /// Persist the canvas under the given name. Validation failures are
    /// returned, never swallowed.
    pub fn save(&mut self, name: &str) -> Result<(), SessionError> {
        let snapshot = self.store.snapshot();
        self.session.save(name, &snapshot)
    }

    /// Load a persisted project, replacing the canvas wholesale.
    pub fn load(&mut self, id: &str) -> Result<(), SessionError> {
        let elements = self.session.load(id)?;
        self.store.replace_all(elements);
        self.selection.clear();
        self.layers.clear();
        self.transform.end();
        self.capture.cancel();
        Ok(())
    }

    /// Start a new project, resetting the canvas.
    pub fn new_project(&mut self, width: f64, height: f64, name: Option<String>) {
        self.session.create(width, height, name);
        self.store.clear();
        self.selection.clear();
        self.layers.clear();
        self.transform.end();
        self.capture.cancel();
    }

    pub fn session_mut(&mut self) -> &mut ProjectSession {
        &mut self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementContent, ElementKind, Geometry};
    use crate::storage::MemoryKv;

    fn editor() -> Editor {
        Editor::new(Box::new(MemoryKv::new()))
    }

    fn editor_with_element() -> (Editor, ElementId) {
        let mut editor = editor();
        let id = editor.add_element(
            ElementSpec::shape("rect").with_geometry(Geometry::new(100.0, 100.0, 200.0, 100.0)),
        );
        (editor, id)
    }

    #[test]
    fn test_click_selects_and_drags() {
        let (mut editor, id) = editor_with_element();
        editor.selection.clear();

        editor.pointer_down(Point::new(150.0, 150.0), Modifiers::default());
        assert!(editor.selection.is_selected(id));
        assert_eq!(editor.selection.primary(), Some(id));
        assert!(editor.transform.is_dragging());

        editor.pointer_move(Point::new(200.0, 180.0));
        editor.pointer_up(Point::new(200.0, 180.0));
        assert!(!editor.transform.is_dragging());

        let geo = editor.store.get(id).unwrap().geometry;
        assert!((geo.x - 150.0).abs() < f64::EPSILON);
        assert!((geo.y - 130.0).abs() < f64::EPSILON);
        assert!(editor.session().is_dirty());
    }

    #[test]
    fn test_corner_drag_resizes() {
        let (mut editor, id) = editor_with_element();

        // Bottom-right handle of the selected element, dragged +50,+30.
        editor.pointer_down(Point::new(300.0, 200.0), Modifiers::default());
        assert!(matches!(
            editor.transform.session().unwrap().mode,
            DragMode::Resize(crate::transform::Corner::BottomRight)
        ));
        editor.pointer_up(Point::new(350.0, 230.0));

        let geo = editor.store.get(id).unwrap().geometry;
        assert!((geo.x - 100.0).abs() < f64::EPSILON);
        assert!((geo.y - 100.0).abs() < f64::EPSILON);
        assert!((geo.w - 250.0).abs() < f64::EPSILON);
        assert!((geo.h - 130.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_modifier_click_toggles_without_dragging() {
        let (mut editor, a) = editor_with_element();
        let b = editor.add_element(
            ElementSpec::shape("circle").with_geometry(Geometry::new(400.0, 100.0, 100.0, 100.0)),
        );
        editor.selection.clear();

        editor.pointer_down(Point::new(150.0, 150.0), Modifiers::default());
        editor.pointer_up(Point::new(150.0, 150.0));

        let shift = Modifiers {
            shift: true,
            ..Default::default()
        };
        editor.pointer_down(Point::new(450.0, 150.0), shift);
        assert!(editor.selection.is_selected(a));
        assert!(editor.selection.is_selected(b));
        assert_eq!(editor.selection.primary(), Some(b));
        assert!(!editor.transform.is_dragging());
        editor.pointer_up(Point::new(450.0, 150.0));

        // Toggling the primary off promotes the other element.
        editor.pointer_down(Point::new(450.0, 150.0), shift);
        assert!(!editor.selection.is_selected(b));
        assert_eq!(editor.selection.primary(), Some(a));
    }

    #[test]
    fn test_empty_click_clears_selection() {
        let (mut editor, _id) = editor_with_element();
        editor.pointer_down(Point::new(700.0, 500.0), Modifiers::default());
        assert!(editor.selection.is_empty());
    }

    #[test]
    fn test_locked_element_is_not_a_target() {
        let (mut editor, id) = editor_with_element();
        editor.selection.clear();
        editor.store.set_locked(id, true);

        editor.pointer_down(Point::new(150.0, 150.0), Modifiers::default());
        assert!(editor.selection.is_empty());
        assert!(!editor.transform.is_dragging());
    }

    #[test]
    fn test_draw_tool_creates_stroke() {
        let mut editor = editor();
        editor.set_tool(ToolKind::Draw);

        editor.pointer_down(Point::new(20.0, 30.0), Modifiers::default());
        editor.pointer_move(Point::new(120.0, 90.0));
        editor.pointer_move(Point::new(70.0, 150.0));
        editor.pointer_up(Point::new(70.0, 150.0));

        assert_eq!(editor.store.len(), 1);
        let element = editor.store.iter().next().unwrap();
        assert_eq!(element.kind, ElementKind::Draw);
        assert!(matches!(element.content, ElementContent::Stroke(_)));
        assert!(editor.selection.is_selected(element.id));
        assert!(editor.session().is_dirty());
    }

    #[test]
    fn test_click_without_movement_draws_nothing() {
        let mut editor = editor();
        editor.set_tool(ToolKind::Draw);
        editor.pointer_down(Point::new(20.0, 30.0), Modifiers::default());
        editor.pointer_up(Point::new(20.0, 30.0));
        assert!(editor.store.is_empty());
    }

    #[test]
    fn test_drag_respects_zoom() {
        let (mut editor, id) = editor_with_element();
        editor.selection.clear();
        editor.camera.set_zoom(200.0);

        // Canvas point (150,150) sits at screen (300,300) at 200%.
        editor.pointer_down(Point::new(300.0, 300.0), Modifiers::default());
        assert!(editor.transform.is_dragging());
        editor.pointer_up(Point::new(400.0, 300.0));

        // 100 screen pixels at 200% is 50 canvas units.
        let geo = editor.store.get(id).unwrap().geometry;
        assert!((geo.x - 150.0).abs() < f64::EPSILON);
        assert!((geo.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_flip_keeps_placement() {
        let (mut editor, id) = editor_with_element();
        let before = editor.store.get(id).unwrap().geometry;

        editor.flip_horizontal();
        editor.flip_vertical();

        let after = editor.store.get(id).unwrap().geometry;
        assert!(after.flip_x);
        assert!(after.flip_y);
        assert!((after.x - before.x).abs() < f64::EPSILON);
        assert!((after.y - before.y).abs() < f64::EPSILON);
        assert!((after.w - before.w).abs() < f64::EPSILON);
        assert!((after.h - before.h).abs() < f64::EPSILON);
    }

    #[test]
    fn test_align_against_canvas() {
        let (mut editor, id) = editor_with_element();
        editor.align(Align::CenterH);
        let geo = editor.store.get(id).unwrap().geometry;
        // (800 - 200) / 2
        assert!((geo.x - 300.0).abs() < f64::EPSILON);
        assert!((geo.y - 100.0).abs() < f64::EPSILON);

        editor.align(Align::CenterH);
        let again = editor.store.get(id).unwrap().geometry;
        assert_eq!(geo, again);
    }

    #[test]
    fn test_align_without_selection_is_noop() {
        let (mut editor, id) = editor_with_element();
        editor.selection.clear();
        let before = editor.store.get(id).unwrap().geometry;
        editor.align(Align::Left);
        assert_eq!(before, editor.store.get(id).unwrap().geometry);
    }

    #[test]
    fn test_update_primary_writes_through() {
        let (mut editor, id) = editor_with_element();
        editor.update_primary(ElementPatch {
            opacity: Some(40.0),
            ..Default::default()
        });
        assert!((editor.store.get(id).unwrap().style.opacity - 40.0).abs() < f64::EPSILON);
        assert!(editor.session().is_dirty());
    }

    #[test]
    fn test_confirm_delete_clears_selection() {
        let (mut editor, id) = editor_with_element();
        editor.layers.click(id);

        let pending = editor.request_delete(id).unwrap();
        editor.confirm_delete(pending);

        assert!(editor.store.is_empty());
        assert!(!editor.selection.is_selected(id));
        assert!(editor.layers.selected().is_empty());
    }

    #[test]
    fn test_group_through_editor() {
        let (mut editor, a) = editor_with_element();
        let b = editor.add_element(ElementSpec::shape("circle"));
        editor.layers.modifier_click(a);
        editor.layers.modifier_click(b);

        let token = editor.group().unwrap();
        assert_eq!(editor.store.get(a).unwrap().group_id, Some(token));
        assert_eq!(editor.store.get(b).unwrap().group_id, Some(token));

        editor.ungroup();
        assert_eq!(editor.store.get(a).unwrap().group_id, None);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let (mut editor, id) = editor_with_element();
        editor.save("Poster").unwrap();
        assert!(!editor.session().is_dirty());
        let project_id = editor.session().current().id.clone();

        editor.new_project(1080.0, 1080.0, Some("Square".to_string()));
        assert!(editor.store.is_empty());

        editor.load(&project_id).unwrap();
        assert_eq!(editor.store.len(), 1);
        assert!(editor.store.contains(id));
        assert!(editor.selection.is_empty());
        assert!(!editor.session().is_dirty());
    }

    #[test]
    fn test_move_without_session_is_noop() {
        let (mut editor, id) = editor_with_element();
        let before = editor.store.get(id).unwrap().geometry;
        editor.pointer_move(Point::new(500.0, 500.0));
        editor.pointer_up(Point::new(500.0, 500.0));
        assert_eq!(before, editor.store.get(id).unwrap().geometry);
    }

    #[test]
    fn test_pointer_leave_ends_drag() {
        let (mut editor, _id) = editor_with_element();
        editor.selection.clear();
        editor.pointer_down(Point::new(150.0, 150.0), Modifiers::default());
        assert!(editor.transform.is_dragging());
        editor.pointer_leave();
        assert!(!editor.transform.is_dragging());
    }
}
