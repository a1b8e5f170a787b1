//! Directory picker screen.
//!
//! One picker shows one directory level. The picker at `/` does not fetch:
//! its single row is the root itself, so the user can export straight into
//! the root or drill into the root listing (`""`).

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{DirectoryEntry, NavigationState, ScreenView};
use crate::navigation::ScreenHandle;
use crate::path;

/// What the picker is choosing a destination for.
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// Screen to unwind to once the export ends.
    pub source: ScreenHandle,
    pub file_name: String,
    pub payload: Arc<[u8]>,
}

#[derive(Debug)]
pub struct DirectoryPicker {
    state: NavigationState,
    job: ExportJob,
    loading: bool,
    busy: bool,
}

impl DirectoryPicker {
    pub fn new(current_path: impl Into<String>, job: ExportJob) -> Self {
        let current_path = current_path.into();
        let mut state = NavigationState::new(current_path.clone());
        let loading = current_path != path::ROOT;
        if !loading {
            state.set_children([DirectoryEntry::directory(path::ROOT)]);
        }
        Self {
            state,
            job,
            loading,
            busy: false,
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn job(&self) -> &ExportJob {
        &self.job
    }

    pub fn current_path(&self) -> &str {
        &self.state.current_path
    }

    /// True until the first listing has been applied.
    pub fn needs_fetch(&self) -> bool {
        self.loading
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn select_row(&mut self, index: usize) -> Result<()> {
        self.state.select(index)
    }

    pub fn toggle_row(&mut self, index: usize) -> Result<()> {
        self.state.toggle(index)
    }

    /// Path of the picker to push for row `index`. Leaves this screen untouched.
    pub fn drill_into(&self, index: usize) -> Result<String> {
        let entry = self.state.entry(index)?;
        Ok(path::child_path(&self.state.current_path, &entry.name))
    }

    /// Upload destination for the selected row.
    pub fn confirm_selection(&self) -> Result<String> {
        let selected = self.state.selected().ok_or(AppError::SelectionMissing)?;
        Ok(path::export_path(
            &self.state.current_path,
            &selected.name,
            &self.job.file_name,
        ))
    }

    /// Marks a request as outstanding; a second one is refused until `end_request`.
    pub fn begin_request(&mut self, handle: ScreenHandle) -> Result<()> {
        if self.busy {
            return Err(AppError::RequestInFlight(handle));
        }
        self.busy = true;
        Ok(())
    }

    pub fn end_request(&mut self) {
        self.busy = false;
    }

    /// Applies a listing result. An empty result leaves the picker with no rows.
    pub fn finish_load(&mut self, children: Vec<DirectoryEntry>) {
        self.state.set_children(children);
        self.loading = false;
        self.busy = false;
    }

    /// Ends a failed request. Rows and selection from an earlier listing stay.
    pub fn abandon_load(&mut self) {
        self.loading = false;
        self.busy = false;
    }

    pub fn view(&self, handle: ScreenHandle) -> ScreenView {
        ScreenView::Picker {
            handle,
            file_name: self.job.file_name.clone(),
            loading: self.loading,
            busy: self.busy,
            state: self.state.clone(),
        }
    }
}
