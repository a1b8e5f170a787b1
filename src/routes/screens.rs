//! Navigation stack endpoints.
//!
//! - GET /api/v1/screens
//!   Current stack (bottom first), pending alerts, network activity flag.
//!
//! - POST /api/v1/back
//!   Pops the top screen; the bottom screen is never popped.
//!
//! - POST /api/v1/alerts/{id}/dismiss
//!   Acknowledges an alert and applies its navigation action.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::error::Result;
use crate::models::SessionView;
use crate::navigation::SharedSession;

pub fn routes(session: SharedSession) -> Router {
    Router::new()
        .route("/api/v1/screens", get(get_screens))
        .route("/api/v1/back", post(go_back))
        .route("/api/v1/alerts/{id}/dismiss", post(dismiss_alert))
        .with_state(session)
}

async fn get_screens(State(session): State<SharedSession>) -> Result<Json<SessionView>> {
    Ok(Json(session.snapshot()?))
}

async fn go_back(State(session): State<SharedSession>) -> Result<Json<SessionView>> {
    session.back()?;
    Ok(Json(session.snapshot()?))
}

async fn dismiss_alert(
    State(session): State<SharedSession>,
    Path(id): Path<u64>,
) -> Result<Json<SessionView>> {
    session.dismiss_alert(id)?;
    Ok(Json(session.snapshot()?))
}
