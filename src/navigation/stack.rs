//! Navigation stack.
//!
//! Every pushed screen gets a `ScreenHandle` and a `CancellationToken`.
//! Removing a screen from the stack cancels its token, which is how
//! outstanding requests learn that their screen is gone.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio_util::sync::CancellationToken;

use crate::error::{AppError, Result};
use crate::models::ScreenView;
use crate::navigation::{DirectoryPicker, FileCreator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScreenHandle(u64);

impl ScreenHandle {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScreenHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A screen owned by the embedding application (the editor, a file list).
#[derive(Debug, Clone)]
pub struct HostScreen {
    pub name: String,
}

#[derive(Debug)]
pub enum Screen {
    Host(HostScreen),
    Picker(DirectoryPicker),
    Creator(FileCreator),
}

impl Screen {
    fn view(&self, handle: ScreenHandle) -> ScreenView {
        match self {
            Screen::Host(host) => ScreenView::Host {
                handle,
                name: host.name.clone(),
            },
            Screen::Picker(picker) => picker.view(handle),
            Screen::Creator(creator) => creator.view(handle),
        }
    }
}

#[derive(Debug)]
struct StackEntry {
    handle: ScreenHandle,
    screen: Screen,
    token: CancellationToken,
}

#[derive(Debug, Default)]
pub struct Navigator {
    next_handle: u64,
    stack: Vec<StackEntry>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, screen: Screen) -> ScreenHandle {
        self.next_handle += 1;
        let handle = ScreenHandle(self.next_handle);
        tracing::debug!("push screen {} (depth {})", handle, self.stack.len() + 1);
        self.stack.push(StackEntry {
            handle,
            screen,
            token: CancellationToken::new(),
        });
        handle
    }

    /// Pops the top screen.
    pub fn pop(&mut self) -> Option<ScreenHandle> {
        let entry = self.stack.pop()?;
        entry.token.cancel();
        tracing::debug!("pop screen {} (depth {})", entry.handle, self.stack.len());
        Some(entry.handle)
    }

    /// Pops `handle` only if it is the top screen.
    pub fn pop_screen(&mut self, handle: ScreenHandle) -> bool {
        if self.top_handle() == Some(handle) {
            self.pop();
            true
        } else {
            tracing::debug!("screen {} is not on top, not popping", handle);
            false
        }
    }

    /// Pops every screen above `handle`. Returns how many were popped; an
    /// unknown handle pops nothing.
    pub fn pop_to(&mut self, handle: ScreenHandle) -> usize {
        let Some(pos) = self.position(handle) else {
            tracing::debug!("pop_to target {} not on stack", handle);
            return 0;
        };
        let mut popped = 0;
        while self.stack.len() > pos + 1 {
            self.pop();
            popped += 1;
        }
        popped
    }

    pub fn contains(&self, handle: ScreenHandle) -> bool {
        self.position(handle).is_some()
    }

    pub fn top_handle(&self) -> Option<ScreenHandle> {
        self.stack.last().map(|e| e.handle)
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn get(&self, handle: ScreenHandle) -> Option<&Screen> {
        self.entry(handle).map(|e| &e.screen)
    }

    pub fn token(&self, handle: ScreenHandle) -> Option<CancellationToken> {
        self.entry(handle).map(|e| e.token.clone())
    }

    pub fn picker_mut(&mut self, handle: ScreenHandle) -> Result<&mut DirectoryPicker> {
        match self.entry_mut(handle).map(|e| &mut e.screen) {
            Some(Screen::Picker(picker)) => Ok(picker),
            _ => Err(AppError::ScreenNotFound(handle)),
        }
    }

    pub fn creator_mut(&mut self, handle: ScreenHandle) -> Result<&mut FileCreator> {
        match self.entry_mut(handle).map(|e| &mut e.screen) {
            Some(Screen::Creator(creator)) => Ok(creator),
            _ => Err(AppError::ScreenNotFound(handle)),
        }
    }

    pub fn views(&self) -> Vec<ScreenView> {
        self.stack.iter().map(|e| e.screen.view(e.handle)).collect()
    }

    fn position(&self, handle: ScreenHandle) -> Option<usize> {
        self.stack.iter().position(|e| e.handle == handle)
    }

    fn entry(&self, handle: ScreenHandle) -> Option<&StackEntry> {
        self.stack.iter().find(|e| e.handle == handle)
    }

    fn entry_mut(&mut self, handle: ScreenHandle) -> Option<&mut StackEntry> {
        self.stack.iter_mut().find(|e| e.handle == handle)
    }
}
