//! Handlers for the operator-only `/scheduled-posts` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use blogcraft_core::error::CoreError;
use blogcraft_core::types::DbId;
use blogcraft_core::validation::validate_input;
use blogcraft_db::models::scheduled_post::{CreateScheduledPost, ScheduledPost};
use blogcraft_db::repositories::ScheduledPostRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/scheduled-posts
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ScheduledPost>>>> {
    let items = ScheduledPostRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/scheduled-posts
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateScheduledPost>,
) -> AppResult<(StatusCode, Json<DataResponse<ScheduledPost>>)> {
    validate_input(&input)?;
    let created = ScheduledPostRepo::create(&state.pool, admin.user_id, &input).await?;
    tracing::info!(
        scheduled_post_id = created.id,
        scheduled_for = %created.scheduled_datetime,
        "Post scheduled"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// DELETE /api/v1/scheduled-posts/{id}
///
/// Operators can only cancel rows they created; anything else is a 404.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ScheduledPostRepo::delete_owned(&state.pool, id, admin.user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "ScheduledPost",
            id,
        }))
    }
}
