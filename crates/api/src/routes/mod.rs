pub mod auth;
pub mod authoring;
pub mod health;
pub mod post;
pub mod scheduled_post;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register                         register (public)
/// /auth/login                            login (public)
///
/// /posts                                 list (public), create (auth)
/// /posts/latest                          five newest (public)
/// /posts/{id}                            get (public), update, delete (author)
///
/// /users/me                              get, update own profile (auth)
/// /users/{username}/posts                author listing (public)
///
/// /scheduled-posts                       list, create (admin)
/// /scheduled-posts/{id}                  delete (admin, own rows)
///
/// /authoring                             get, submit action, reset (auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/posts", post::router())
        .nest("/users", user::router())
        .nest("/scheduled-posts", scheduled_post::router())
        .nest("/authoring", authoring::router())
}
