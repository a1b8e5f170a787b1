//! Create-file/directory form endpoints.
//!
//! - POST /api/v1/creator { path }
//!   Opens the form for a new entry inside `path`.
//!
//! - POST /api/v1/creator/{handle} { name?, kind? }
//!   Edits the form; `kind` is "file" or "directory".
//!
//! - POST /api/v1/creator/{handle}/submit
//!   Validates locally, then issues one create call.

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;

use crate::error::Result;
use crate::models::{FileKind, SessionView};
use crate::navigation::{ScreenHandle, SharedSession};

pub fn routes(session: SharedSession) -> Router {
    Router::new()
        .route("/api/v1/creator", post(open_creator))
        .route("/api/v1/creator/{handle}", post(edit_creator))
        .route("/api/v1/creator/{handle}/submit", post(submit_creator))
        .with_state(session)
}

#[derive(Debug, Deserialize)]
struct OpenCreatorRequest {
    path: String,
}

#[derive(Debug, Deserialize)]
struct EditCreatorRequest {
    name: Option<String>,
    kind: Option<FileKind>,
}

async fn open_creator(
    State(session): State<SharedSession>,
    Json(request): Json<OpenCreatorRequest>,
) -> Result<Json<SessionView>> {
    session.open_creator(&request.path)?;
    Ok(Json(session.snapshot()?))
}

async fn edit_creator(
    State(session): State<SharedSession>,
    Path(handle): Path<u64>,
    Json(request): Json<EditCreatorRequest>,
) -> Result<Json<SessionView>> {
    session.edit_creator(ScreenHandle::from_raw(handle), request.name, request.kind)?;
    Ok(Json(session.snapshot()?))
}

async fn submit_creator(
    State(session): State<SharedSession>,
    Path(handle): Path<u64>,
) -> Result<Json<SessionView>> {
    session.submit_creator(ScreenHandle::from_raw(handle)).await?;
    Ok(Json(session.snapshot()?))
}
