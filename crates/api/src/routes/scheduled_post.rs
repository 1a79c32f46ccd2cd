//! Route definitions for the `/scheduled-posts` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::scheduled_post;
use crate::state::AppState;

/// Routes mounted at `/scheduled-posts`. All require the admin role.
///
/// ```text
/// GET    /            -> list
/// POST   /            -> create
/// DELETE /{id}        -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(scheduled_post::list).post(scheduled_post::create))
        .route("/{id}", delete(scheduled_post::delete))
}
