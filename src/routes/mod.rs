//! API route handlers - maps HTTP endpoints to session operations.
//!
//! Each submodule defines routes for a feature area:
//! - `screens`: Stack snapshot, back navigation, alert dismissal
//! - `picker`: Directory picker open/select/drill/confirm
//! - `creator`: Create-file/directory form
//!
//! Every successful action answers with the full `SessionView` so the
//! front-end can re-render from a single source of truth.

pub mod creator;
pub mod picker;
pub mod screens;

use axum::Router;

use crate::navigation::SharedSession;

pub fn create_router(session: SharedSession) -> Router {
    Router::new()
        .merge(screens::routes(session.clone()))
        .merge(picker::routes(session.clone()))
        .merge(creator::routes(session))
}
