//! Directory picker endpoints.
//!
//! - POST /api/v1/picker { path, file_name, content, source? }
//!   Opens a picker at `path` for exporting `content` as `file_name`.
//!   `source` is the screen to return to; defaults to the current top screen.
//!
//! - POST /api/v1/picker/{handle}/select { index }
//! - POST /api/v1/picker/{handle}/toggle { index }
//!   Single selection; toggle clears the row when it is already selected.
//!
//! - POST /api/v1/picker/{handle}/drill { index }
//!   Pushes and loads a picker one level below the row.
//!
//! - POST /api/v1/picker/{handle}/refresh
//!   Fetches the listing again.
//!
//! - POST /api/v1/picker/{handle}/confirm
//!   Exports into the selected directory and unwinds to the source screen.

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::SessionView;
use crate::navigation::{ScreenHandle, SharedSession};

pub fn routes(session: SharedSession) -> Router {
    Router::new()
        .route("/api/v1/picker", post(open_picker))
        .route("/api/v1/picker/{handle}/select", post(select_row))
        .route("/api/v1/picker/{handle}/toggle", post(toggle_row))
        .route("/api/v1/picker/{handle}/drill", post(drill_into))
        .route("/api/v1/picker/{handle}/refresh", post(refresh))
        .route("/api/v1/picker/{handle}/confirm", post(confirm))
        .with_state(session)
}

#[derive(Debug, Deserialize)]
struct OpenPickerRequest {
    #[serde(default = "default_root")]
    path: String,
    file_name: String,
    #[serde(default)]
    content: String,
    source: Option<u64>,
}

fn default_root() -> String {
    crate::path::ROOT.to_string()
}

#[derive(Debug, Deserialize)]
struct RowRequest {
    index: usize,
}

async fn open_picker(
    State(session): State<SharedSession>,
    Json(request): Json<OpenPickerRequest>,
) -> Result<Json<SessionView>> {
    let source = match request.source {
        Some(raw) => ScreenHandle::from_raw(raw),
        None => session
            .top_screen()?
            .ok_or_else(|| AppError::Internal("Navigation stack is empty".to_string()))?,
    };
    session
        .open_picker(
            source,
            &request.path,
            &request.file_name,
            request.content.into_bytes(),
        )
        .await?;
    Ok(Json(session.snapshot()?))
}

async fn select_row(
    State(session): State<SharedSession>,
    Path(handle): Path<u64>,
    Json(request): Json<RowRequest>,
) -> Result<Json<SessionView>> {
    session.select_row(ScreenHandle::from_raw(handle), request.index)?;
    Ok(Json(session.snapshot()?))
}

async fn toggle_row(
    State(session): State<SharedSession>,
    Path(handle): Path<u64>,
    Json(request): Json<RowRequest>,
) -> Result<Json<SessionView>> {
    session.toggle_row(ScreenHandle::from_raw(handle), request.index)?;
    Ok(Json(session.snapshot()?))
}

async fn drill_into(
    State(session): State<SharedSession>,
    Path(handle): Path<u64>,
    Json(request): Json<RowRequest>,
) -> Result<Json<SessionView>> {
    session
        .drill_into(ScreenHandle::from_raw(handle), request.index)
        .await?;
    Ok(Json(session.snapshot()?))
}

async fn refresh(
    State(session): State<SharedSession>,
    Path(handle): Path<u64>,
) -> Result<Json<SessionView>> {
    session.refresh_picker(ScreenHandle::from_raw(handle)).await?;
    Ok(Json(session.snapshot()?))
}

async fn confirm(
    State(session): State<SharedSession>,
    Path(handle): Path<u64>,
) -> Result<Json<SessionView>> {
    session.confirm_selection(ScreenHandle::from_raw(handle)).await?;
    Ok(Json(session.snapshot()?))
}
