//! Route definitions for the `/users` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{post, user};
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /me                 -> get_me
/// PUT    /me                 -> update_me
/// GET    /{username}/posts   -> list_by_user (?page=N)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(user::get_me).put(user::update_me))
        .route("/{username}/posts", get(post::list_by_user))
}
