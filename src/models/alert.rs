use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::navigation::ScreenHandle;

/// What happens to the navigation stack once an alert is acknowledged.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "action", content = "screen", rename_all = "snake_case")]
pub enum AlertAction {
    #[default]
    None,
    /// Pop the given screen if it is still on top.
    PopScreen(ScreenHandle),
    /// Pop every screen above the given one.
    PopTo(ScreenHandle),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Alert {
    pub id: u64,
    pub title: String,
    pub message: String,
    pub buttons: Vec<String>,
    pub on_dismiss: AlertAction,
}

pub const TITLE_ERROR: &str = "Error";
pub const BUTTON_CLOSE: &str = "Close";
pub const BUTTON_OK: &str = "OK";

/// Title, message and button for an error shown to the user.
pub fn alert_text(error: &AppError) -> (String, String, String) {
    let message = match error {
        AppError::Transport(_) => "Could not reach cloud storage. Please try again.".to_string(),
        AppError::EmptyResult(_) => "There are no directories here.".to_string(),
        AppError::EmptyName => "Please enter a name.".to_string(),
        AppError::DuplicateName(name) => {
            format!("A file or directory named \"{}\" already exists.", name)
        }
        AppError::SelectionMissing => "Please select a directory.".to_string(),
        AppError::ClientUnavailable => "Cloud storage is not linked.".to_string(),
        other => other.to_string(),
    };
    let button = match error {
        AppError::EmptyResult(_) | AppError::EmptyName | AppError::DuplicateName(_) => BUTTON_CLOSE,
        _ => BUTTON_OK,
    };
    (TITLE_ERROR.to_string(), message, button.to_string())
}

/// Pending alerts in presentation order.
#[derive(Debug, Default)]
pub struct AlertQueue {
    next_id: u64,
    pending: Vec<Alert>,
}

impl AlertQueue {
    pub fn push_error(&mut self, error: &AppError, on_dismiss: AlertAction) -> u64 {
        let (title, message, button) = alert_text(error);
        self.push(title, message, vec![button], on_dismiss)
    }

    pub fn push(
        &mut self,
        title: String,
        message: String,
        buttons: Vec<String>,
        on_dismiss: AlertAction,
    ) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.pending.push(Alert {
            id,
            title,
            message,
            buttons,
            on_dismiss,
        });
        id
    }

    pub fn take(&mut self, id: u64) -> Option<Alert> {
        let pos = self.pending.iter().position(|a| a.id == id)?;
        Some(self.pending.remove(pos))
    }

    pub fn pending(&self) -> &[Alert] {
        &self.pending
    }
}
