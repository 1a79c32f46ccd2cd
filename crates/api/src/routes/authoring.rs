//! Route definitions for the `/authoring` workflow.

use axum::routing::get;
use axum::Router;

use crate::handlers::authoring;
use crate::state::AppState;

/// Routes mounted at `/authoring`.
///
/// ```text
/// GET    /    -> get_session
/// POST   /    -> submit
/// DELETE /    -> reset
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(authoring::get_session)
            .post(authoring::submit)
            .delete(authoring::reset),
    )
}
