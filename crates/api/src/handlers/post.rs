//! Handlers for the `/posts` resource and per-author listings.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use blogcraft_core::error::CoreError;
use blogcraft_core::types::DbId;
use blogcraft_core::validation::validate_input;
use blogcraft_db::models::post::{Post, PostForm, UpdatePost};
use blogcraft_db::repositories::{PostRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::query::{PageParams, POSTS_PER_PAGE};
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Post", id })
}

/// Load a post and make sure `user_id` wrote it.
async fn find_owned(state: &AppState, id: DbId, user_id: DbId) -> AppResult<Post> {
    let post = PostRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if post.author_id != Some(user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author can modify this post".into(),
        )));
    }
    Ok(post)
}

/// GET /api/v1/posts?page=N
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<PageResponse<Post>>> {
    let page = PostRepo::list_page(&state.pool, params.page(), POSTS_PER_PAGE).await?;
    Ok(Json(page.into()))
}

/// GET /api/v1/posts/latest
pub async fn latest(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Post>>>> {
    let posts = PostRepo::list_latest(&state.pool, POSTS_PER_PAGE).await?;
    Ok(Json(DataResponse { data: posts }))
}

/// GET /api/v1/posts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Post>>> {
    let post = PostRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: post }))
}

/// POST /api/v1/posts
///
/// The new post is always a draft owned by the caller.
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(form): Json<PostForm>,
) -> AppResult<(StatusCode, Json<DataResponse<Post>>)> {
    validate_input(&form)?;
    let post = PostRepo::create(&state.pool, Some(user.user_id), &form.into_draft()).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: post })))
}

/// PUT /api/v1/posts/{id}
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePost>,
) -> AppResult<Json<DataResponse<Post>>> {
    validate_input(&input)?;
    find_owned(&state, id, user.user_id).await?;
    let post = PostRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: post }))
}

/// DELETE /api/v1/posts/{id}
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_owned(&state, id, user.user_id).await?;
    if PostRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// GET /api/v1/users/{username}/posts?page=N
pub async fn list_by_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<PageResponse<Post>>> {
    let user = UserRepo::find_by_username(&state.pool, &username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User '{username}' not found")))?;
    let page =
        PostRepo::list_page_by_author(&state.pool, user.id, params.page(), POSTS_PER_PAGE).await?;
    Ok(Json(page.into()))
}
