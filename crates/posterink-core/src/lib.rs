//! Posterink Core Library
//!
//! Platform-agnostic scene-editing engine for the Posterink poster and
//! banner designer: the element data model, pointer-driven transforms,
//! freehand capture, layer management and project persistence.

pub mod camera;
pub mod editor;
pub mod element;
pub mod layers;
pub mod project;
pub mod selection;
pub mod storage;
pub mod store;
pub mod tools;
pub mod transform;

pub use camera::Camera;
pub use editor::{Editor, ExportFormat, ExportSettings, Modifiers, WatermarkPosition};
pub use element::{
    BrushKind, CanvasElement, ElementContent, ElementId, ElementKind, ElementPatch, ElementSpec,
    ElementStyle, Geometry, GroupId, Rgba, StrokeContent, MIN_ELEMENT_SIZE,
};
pub use layers::{LayerManager, LayerRow, PendingDelete};
pub use project::{
    PendingProjectDelete, Project, ProjectSession, SaveCheck, SessionError, MAX_PROJECTS,
};
pub use selection::Selection;
pub use storage::{KvStore, MemoryKv, StorageError};
pub use store::{ElementStore, Reorder};
pub use tools::{BrushSettings, PathCapture, ToolKind};
pub use transform::{Align, Corner, DragMode, DragSession, TransformEngine};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileKv;
