//! Create-file/directory form.
//!
//! Editing → Validating → {Editing (with error), Submitting} → {Done, Error}.
//! Validation runs entirely against the local store, so a rejected name
//! never costs a network call.

use crate::error::{AppError, Result};
use crate::local::LocalStore;
use crate::models::{CreatorPhase, FileKind, ScreenView};
use crate::navigation::ScreenHandle;
use crate::path;

/// A validated create call ready to be issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    pub kind: FileKind,
    pub remote_path: String,
    pub name: String,
}

#[derive(Debug)]
pub struct FileCreator {
    path: String,
    name: String,
    kind: FileKind,
    phase: CreatorPhase,
}

impl FileCreator {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: String::new(),
            kind: FileKind::default(),
            phase: CreatorPhase::Editing,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn phase(&self) -> CreatorPhase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, CreatorPhase::Validating | CreatorPhase::Submitting)
    }

    pub fn set_name(&mut self, handle: ScreenHandle, name: impl Into<String>) -> Result<()> {
        self.ensure_editing(handle)?;
        self.name = name.into();
        Ok(())
    }

    /// Picks one of the two kinds; the other is implicitly deselected.
    pub fn select_kind(&mut self, handle: ScreenHandle, kind: FileKind) -> Result<()> {
        self.ensure_editing(handle)?;
        self.kind = kind;
        Ok(())
    }

    /// Validates the form and, on success, moves to `Submitting`.
    pub fn submit(&mut self, handle: ScreenHandle, store: &dyn LocalStore) -> Result<CreateRequest> {
        self.ensure_editing(handle)?;
        self.phase = CreatorPhase::Validating;

        match self.validate(store) {
            Ok(request) => {
                self.phase = CreatorPhase::Submitting;
                Ok(request)
            }
            Err(e) => {
                self.phase = CreatorPhase::Editing;
                Err(e)
            }
        }
    }

    /// Returns a validated form to `Editing` when the call could not be issued.
    pub fn reopen(&mut self) {
        if self.phase == CreatorPhase::Submitting {
            self.phase = CreatorPhase::Editing;
        }
    }

    pub fn finish(&mut self, succeeded: bool) {
        self.phase = if succeeded {
            CreatorPhase::Done
        } else {
            CreatorPhase::Error
        };
    }

    fn validate(&self, store: &dyn LocalStore) -> Result<CreateRequest> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::EmptyName);
        }

        let local = store.local_path(&self.path, name)?;
        if store.exists(&local) {
            return Err(AppError::DuplicateName(name.to_string()));
        }

        Ok(CreateRequest {
            kind: self.kind,
            remote_path: path::create_path(&self.path, name),
            name: name.to_string(),
        })
    }

    fn ensure_editing(&self, handle: ScreenHandle) -> Result<()> {
        if self.phase == CreatorPhase::Editing {
            Ok(())
        } else {
            Err(AppError::RequestInFlight(handle))
        }
    }

    pub fn view(&self, handle: ScreenHandle) -> ScreenView {
        ScreenView::Creator {
            handle,
            path: self.path.clone(),
            name: self.name.clone(),
            kind: self.kind,
            phase: self.phase,
            busy: self.is_busy(),
        }
    }
}
