//! Project session: dirty tracking, save validation and persistence.

use crate::element::CanvasElement;
use crate::storage::{KvStore, StorageError};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

/// Namespace key under which all persisted projects are stored.
pub const PROJECTS_KEY: &str = "posterink.projects";

/// Maximum number of simultaneously persisted projects.
pub const MAX_PROJECTS: usize = 5;

/// Default canvas size for new projects.
pub const DEFAULT_CANVAS_WIDTH: f64 = 800.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 600.0;

/// A persisted project record. The serialized shape is stable: external
/// tooling reads it as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub width: f64,
    pub height: f64,
    /// Epoch milliseconds of the last successful save.
    pub last_modified: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub elements: Vec<CanvasElement>,
}

impl Project {
    fn new(width: f64, height: f64, name: String) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            name,
            width,
            height,
            last_modified: now_ms(),
            thumbnail: None,
            elements: Vec::new(),
        }
    }
}

/// Outcome of a pre-save validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveCheck {
    Ok,
    /// Already at capacity and the current project is not among the
    /// persisted ones; save is blocked.
    LimitReached,
    /// Another persisted project shares the name; the user must rename
    /// before retrying.
    DuplicateName,
}

/// Errors surfaced by the project session. Validation failures are never
/// silently dropped.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("project limit reached (max {MAX_PROJECTS})")]
    LimitReached,
    #[error("another project is already named \"{0}\"")]
    DuplicateName(String),
    #[error("project not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A project delete waiting for user confirmation. Dropping the token
/// cancels the delete.
#[derive(Debug)]
#[must_use = "dropping a pending delete cancels it"]
pub struct PendingProjectDelete {
    id: String,
}

impl PendingProjectDelete {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn confirm(self, session: &mut ProjectSession) -> Result<(), SessionError> {
        session.delete(&self.id)
    }
}

/// The editing session around the current project.
///
/// The session owns the dirty flag and the persistence contract: all
/// projects live as one JSON list under [`PROJECTS_KEY`], and the full list
/// is rewritten on every mutation.
pub struct ProjectSession {
    store: Box<dyn KvStore>,
    current: Project,
    dirty: bool,
}

impl ProjectSession {
    /// Open a session with a fresh default project.
    pub fn new(store: Box<dyn KvStore>) -> Self {
        Self::with_canvas(store, DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT, None)
    }

    /// Open a session with a new project of the given size.
    pub fn with_canvas(
        store: Box<dyn KvStore>,
        width: f64,
        height: f64,
        name: Option<String>,
    ) -> Self {
        let name = name.unwrap_or_else(|| "Untitled Design".to_string());
        info!("starting project session: {} ({}x{})", name, width, height);
        Self {
            store,
            current: Project::new(width, height, name),
            dirty: false,
        }
    }

    /// Replace the current project with a brand-new one.
    pub fn create(&mut self, width: f64, height: f64, name: Option<String>) -> &Project {
        let name = name.unwrap_or_else(|| "Untitled Design".to_string());
        self.current = Project::new(width, height, name);
        self.dirty = false;
        &self.current
    }

    pub fn current(&self) -> &Project {
        &self.current
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record that the canvas has unsaved changes.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// All persisted projects. An absent or corrupt list reads as empty.
    pub fn list(&self) -> Result<Vec<Project>, SessionError> {
        let Some(raw) = self.store.get(PROJECTS_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(projects) => Ok(projects),
            Err(e) => {
                warn!("ignoring unreadable project list: {}", e);
                Ok(Vec::new())
            }
        }
    }

    /// Check whether a save under `name` would be accepted.
    pub fn validate_save(&self, name: &str) -> Result<SaveCheck, SessionError> {
        let projects = self.list()?;
        let persisted = projects.iter().any(|p| p.id == self.current.id);
        if !persisted && projects.len() >= MAX_PROJECTS {
            return Ok(SaveCheck::LimitReached);
        }
        if projects
            .iter()
            .any(|p| p.id != self.current.id && p.name == name)
        {
            return Ok(SaveCheck::DuplicateName);
        }
        Ok(SaveCheck::Ok)
    }

    /// Persist the current project under `name` with the given elements.
    ///
    /// Validation runs first: a blocked save returns the matching error and
    /// leaves both the persisted list and the dirty flag untouched. A
    /// successful save stamps the modification time and clears the dirty
    /// flag.
    pub fn save(&mut self, name: &str, elements: &[CanvasElement]) -> Result<(), SessionError> {
        match self.validate_save(name)? {
            SaveCheck::Ok => {}
            SaveCheck::LimitReached => return Err(SessionError::LimitReached),
            SaveCheck::DuplicateName => {
                return Err(SessionError::DuplicateName(name.to_string()));
            }
        }

        self.current.name = name.to_string();
        self.current.elements = elements.to_vec();
        self.current.last_modified = now_ms();

        let mut projects = self.list()?;
        match projects.iter_mut().find(|p| p.id == self.current.id) {
            Some(slot) => *slot = self.current.clone(),
            None => projects.push(self.current.clone()),
        }
        self.write_all(&projects)?;

        self.dirty = false;
        info!("saved project \"{}\" ({} elements)", name, elements.len());
        Ok(())
    }

    /// Load a persisted project, making it current.
    ///
    /// Returns the elements so the caller can replace the canvas wholesale.
    /// Clears the dirty flag.
    pub fn load(&mut self, id: &str) -> Result<Vec<CanvasElement>, SessionError> {
        let projects = self.list()?;
        let project = projects
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        debug!("loaded project \"{}\"", project.name);
        let elements = project.elements.clone();
        self.current = project;
        self.dirty = false;
        Ok(elements)
    }

    /// Begin deleting a persisted project; the delete runs only on confirm.
    pub fn request_delete(&self, id: &str) -> PendingProjectDelete {
        PendingProjectDelete { id: id.to_string() }
    }

    /// Remove a project from the persisted list.
    pub fn delete(&mut self, id: &str) -> Result<(), SessionError> {
        let mut projects = self.list()?;
        projects.retain(|p| p.id != id);
        self.write_all(&projects)
    }

    fn write_all(&self, projects: &[Project]) -> Result<(), SessionError> {
        let json = serde_json::to_string(projects)?;
        self.store.set(PROJECTS_KEY, &json)?;
        Ok(())
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
