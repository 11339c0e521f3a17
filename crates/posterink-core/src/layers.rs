//! Layer panel model: z-order presentation, visibility/lock toggles,
//! multi-select grouping and confirmation-gated deletion.

use crate::element::{ElementId, GroupId};
use crate::store::ElementStore;
use uuid::Uuid;

/// One row of the layer panel.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRow {
    pub id: ElementId,
    pub label: String,
    pub visible: bool,
    pub locked: bool,
    pub grouped: bool,
}

/// A delete waiting for user confirmation.
///
/// Dropping the token cancels the delete and leaves all state untouched;
/// only an explicit confirm removes the element.
#[derive(Debug)]
#[must_use = "dropping a pending delete cancels it"]
pub struct PendingDelete {
    id: ElementId,
}

impl PendingDelete {
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Carry out the delete. Returns the removed id so callers can clear it
    /// from selection state.
    pub fn confirm(self, store: &mut ElementStore) -> ElementId {
        store.remove(self.id);
        self.id
    }
}

/// Multi-select and grouping state for the layer panel.
///
/// The panel's selection is an explicit ordered list, independent of
/// z-order and of the canvas selection.
#[derive(Debug, Clone, Default)]
pub struct LayerManager {
    selected: Vec<ElementId>,
}

impl LayerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Panel rows, topmost element first.
    pub fn rows(&self, store: &ElementStore) -> Vec<LayerRow> {
        store
            .iter_topmost_first()
            .map(|element| LayerRow {
                id: element.id,
                label: element.label(),
                visible: element.visible,
                locked: element.locked,
                grouped: element.group_id.is_some(),
            })
            .collect()
    }

    /// Row click without modifier: single selection.
    pub fn click(&mut self, id: ElementId) {
        self.selected.clear();
        self.selected.push(id);
    }

    /// Modifier row click: toggle membership in the multi-select list.
    pub fn modifier_click(&mut self, id: ElementId) {
        if let Some(index) = self.selected.iter().position(|&s| s == id) {
            self.selected.remove(index);
        } else {
            self.selected.push(id);
        }
    }

    pub fn selected(&self) -> &[ElementId] {
        &self.selected
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Drop an id that no longer exists.
    pub fn forget(&mut self, id: ElementId) {
        self.selected.retain(|&s| s != id);
    }

    pub fn toggle_visible(&self, store: &mut ElementStore, id: ElementId) {
        if let Some(element) = store.get(id) {
            let visible = element.visible;
            store.set_visible(id, !visible);
        }
    }

    pub fn toggle_locked(&self, store: &mut ElementStore, id: ElementId) {
        if let Some(element) = store.get(id) {
            let locked = element.locked;
            store.set_locked(id, !locked);
        }
    }

    /// Begin a delete. Returns `None` for unknown ids.
    pub fn request_delete(&self, store: &ElementStore, id: ElementId) -> Option<PendingDelete> {
        store.contains(id).then_some(PendingDelete { id })
    }

    /// Group the multi-selected elements under one fresh token.
    ///
    /// No-op (returns `None`) with fewer than two selected elements. Group
    /// membership is metadata: it does not introduce a composite transform,
    /// so moving one member does not move the others.
    pub fn group(&self, store: &mut ElementStore) -> Option<GroupId> {
        if self.selected.len() < 2 {
            return None;
        }
        let token = Uuid::now_v7();
        store.set_group(&self.selected, Some(token));
        Some(token)
    }

    /// Clear the group token on every selected element that has one.
    pub fn ungroup(&self, store: &mut ElementStore) {
        let grouped: Vec<ElementId> = self
            .selected
            .iter()
            .copied()
            .filter(|&id| store.get(id).is_some_and(|e| e.group_id.is_some()))
            .collect();
        store.set_group(&grouped, None);
    }
}
