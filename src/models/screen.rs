//! Serializable snapshots of the navigation stack for front-end consumption.

use serde::{Deserialize, Serialize};

use crate::models::{Alert, NavigationState};
use crate::navigation::ScreenHandle;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    #[default]
    File,
    Directory,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CreatorPhase {
    Editing,
    Validating,
    Submitting,
    Done,
    Error,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScreenView {
    Host {
        handle: ScreenHandle,
        name: String,
    },
    Picker {
        handle: ScreenHandle,
        file_name: String,
        loading: bool,
        busy: bool,
        state: NavigationState,
    },
    Creator {
        handle: ScreenHandle,
        path: String,
        name: String,
        kind: FileKind,
        phase: CreatorPhase,
        busy: bool,
    },
}

impl ScreenView {
    pub fn handle(&self) -> ScreenHandle {
        match self {
            ScreenView::Host { handle, .. }
            | ScreenView::Picker { handle, .. }
            | ScreenView::Creator { handle, .. } => *handle,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub screens: Vec<ScreenView>,
    pub alerts: Vec<Alert>,
    pub network_active: bool,
}
