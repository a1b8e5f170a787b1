//! Application error types and HTTP response mapping.
//!
//! Defines `AppError` for every condition a screen can run into and
//! implements Axum's `IntoResponse` so handlers can return it directly.
//!
//! Error mappings:
//! - `ScreenNotFound`, `AlertNotFound` → 404
//! - `EmptyName`, `DuplicateName`, `SelectionMissing`, `InvalidIndex`, `InvalidPath` → 400
//! - `RequestInFlight`, `Cancelled` → 409
//! - `EmptyResult` → 422
//! - `Transport` → 502
//! - `ClientUnavailable` → 503
//! - `Io`, `Internal` → 500

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::navigation::ScreenHandle;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("No directories found at {0:?}")]
    EmptyResult(String),

    #[error("Name is empty")]
    EmptyName,

    #[error("An entry named {0:?} already exists")]
    DuplicateName(String),

    #[error("No directory selected")]
    SelectionMissing,

    #[error("Row {index} is out of range ({len} rows)")]
    InvalidIndex { index: usize, len: usize },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Screen not found: {0}")]
    ScreenNotFound(ScreenHandle),

    #[error("Alert not found: {0}")]
    AlertNotFound(u64),

    #[error("A request is already in flight for screen {0}")]
    RequestInFlight(ScreenHandle),

    #[error("Request cancelled: screen {0} was dismissed")]
    Cancelled(ScreenHandle),

    #[error("Cloud storage is not available")]
    ClientUnavailable,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable identifier used in JSON bodies and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Transport(_) => "transport",
            AppError::EmptyResult(_) => "empty_result",
            AppError::EmptyName => "empty_name",
            AppError::DuplicateName(_) => "duplicate_name",
            AppError::SelectionMissing => "selection_missing",
            AppError::InvalidIndex { .. } => "invalid_index",
            AppError::InvalidPath(_) => "invalid_path",
            AppError::ScreenNotFound(_) => "screen_not_found",
            AppError::AlertNotFound(_) => "alert_not_found",
            AppError::RequestInFlight(_) => "request_in_flight",
            AppError::Cancelled(_) => "cancelled",
            AppError::ClientUnavailable => "client_unavailable",
            AppError::Io(_) => "io",
            AppError::Internal(_) => "internal",
        }
    }

    /// Whether the error is something the user should see as an alert.
    pub fn is_user_facing(&self) -> bool {
        !matches!(
            self,
            AppError::Cancelled(_)
                | AppError::ScreenNotFound(_)
                | AppError::AlertNotFound(_)
                | AppError::RequestInFlight(_)
                | AppError::InvalidIndex { .. }
        )
    }

    pub(crate) fn lock_poisoned() -> Self {
        AppError::Internal("Lock poisoned".to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::ScreenNotFound(_) | AppError::AlertNotFound(_) => StatusCode::NOT_FOUND,
            AppError::EmptyName
            | AppError::DuplicateName(_)
            | AppError::SelectionMissing
            | AppError::InvalidIndex { .. }
            | AppError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            AppError::RequestInFlight(_) | AppError::Cancelled(_) => StatusCode::CONFLICT,
            AppError::EmptyResult(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Transport(_) => StatusCode::BAD_GATEWAY,
            AppError::ClientUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Io(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
