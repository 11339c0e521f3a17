//! Ordered element store. Z-order equals position in the sequence.

use crate::element::{CanvasElement, ElementId, ElementPatch, ElementSpec, GroupId};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Z-order reordering commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reorder {
    /// Move to the top of the stack.
    Front,
    /// Swap one step towards the top.
    Forward,
    /// Swap one step towards the bottom.
    Backward,
    /// Move to the bottom of the stack.
    Back,
}

/// The canonical ordered list of canvas elements.
///
/// The list index is the z-order: index 0 is bottommost, the last element is
/// topmost, and `add` always appends. All operations are total; an unknown
/// id is a silent no-op.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementStore {
    elements: Vec<CanvasElement>,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new element from a spec. The element becomes topmost.
    pub fn add(&mut self, spec: ElementSpec) -> ElementId {
        let element = CanvasElement::from_spec(spec);
        let id = element.id;
        self.elements.push(element);
        id
    }

    /// Insert an already-built element (used when loading a project).
    pub fn push(&mut self, element: CanvasElement) {
        self.elements.push(element);
    }

    /// Remove an element. Returns the removed element, if present.
    pub fn remove(&mut self, id: ElementId) -> Option<CanvasElement> {
        let index = self.position(id)?;
        Some(self.elements.remove(index))
    }

    /// Shallow-merge a patch onto an element.
    pub fn update(&mut self, id: ElementId, patch: &ElementPatch) {
        if let Some(element) = self.get_mut(id) {
            patch.apply(element);
        }
    }

    /// Change an element's z-order.
    pub fn reorder(&mut self, id: ElementId, command: Reorder) {
        let Some(index) = self.position(id) else {
            return;
        };
        match command {
            Reorder::Front => {
                let element = self.elements.remove(index);
                self.elements.push(element);
            }
            Reorder::Forward => {
                if index + 1 < self.elements.len() {
                    self.elements.swap(index, index + 1);
                }
            }
            Reorder::Backward => {
                if index > 0 {
                    self.elements.swap(index, index - 1);
                }
            }
            Reorder::Back => {
                let element = self.elements.remove(index);
                self.elements.insert(0, element);
            }
        }
    }

    pub fn set_visible(&mut self, id: ElementId, visible: bool) {
        if let Some(element) = self.get_mut(id) {
            element.visible = visible;
        }
    }

    pub fn set_locked(&mut self, id: ElementId, locked: bool) {
        if let Some(element) = self.get_mut(id) {
            element.locked = locked;
        }
    }

    /// Assign (or clear, with `None`) the group token on the given elements.
    pub fn set_group(&mut self, ids: &[ElementId], group_id: Option<GroupId>) {
        for &id in ids {
            if let Some(element) = self.get_mut(id) {
                element.group_id = group_id;
            }
        }
    }

    pub fn get(&self, id: ElementId) -> Option<&CanvasElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut CanvasElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Index of an element in the z-order.
    pub fn position(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.position(id).is_some()
    }

    /// Elements bottom-to-top (paint order).
    pub fn iter(&self) -> impl Iterator<Item = &CanvasElement> {
        self.elements.iter()
    }

    /// Elements top-to-bottom (layer-panel order).
    pub fn iter_topmost_first(&self) -> impl Iterator<Item = &CanvasElement> {
        self.elements.iter().rev()
    }

    /// Topmost interactive element under a canvas-space point.
    /// Hidden and locked elements are not hit-targets.
    pub fn topmost_at(&self, point: Point) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|e| e.is_interactive() && e.geometry.contains(point))
            .map(|e| e.id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Snapshot of all elements for persistence.
    pub fn snapshot(&self) -> Vec<CanvasElement> {
        self.elements.clone()
    }

    /// Replace all elements wholesale (project load).
    pub fn replace_all(&mut self, elements: Vec<CanvasElement>) {
        self.elements = elements;
    }
}
