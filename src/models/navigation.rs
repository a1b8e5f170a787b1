//! Per-screen navigation state for the directory picker.
//!
//! `children` only ever holds directories and `selected_index` names at most
//! one row. Both are enforced here rather than by the screen.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::DirectoryEntry;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavigationState {
    pub current_path: String,
    pub children: Vec<DirectoryEntry>,
    pub selected_index: Option<usize>,
}

impl NavigationState {
    pub fn new(current_path: impl Into<String>) -> Self {
        Self {
            current_path: current_path.into(),
            children: Vec::new(),
            selected_index: None,
        }
    }

    /// Replaces the rows with the directories in `entries` and clears the selection.
    pub fn set_children(&mut self, entries: impl IntoIterator<Item = DirectoryEntry>) {
        self.children = entries.into_iter().filter(|e| e.is_directory).collect();
        self.selected_index = None;
    }

    pub fn entry(&self, index: usize) -> Result<&DirectoryEntry> {
        self.children.get(index).ok_or(AppError::InvalidIndex {
            index,
            len: self.children.len(),
        })
    }

    /// Marks `index` as the only selected row.
    pub fn select(&mut self, index: usize) -> Result<()> {
        self.entry(index)?;
        self.selected_index = Some(index);
        Ok(())
    }

    /// Long-press behaviour: pressing the checked row again unchecks it.
    pub fn toggle(&mut self, index: usize) -> Result<()> {
        self.entry(index)?;
        self.selected_index = match self.selected_index {
            Some(current) if current == index => None,
            _ => Some(index),
        };
        Ok(())
    }

    pub fn selected(&self) -> Option<&DirectoryEntry> {
        self.selected_index.and_then(|i| self.children.get(i))
    }
}
