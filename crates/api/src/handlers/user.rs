//! Handlers for the caller's own account under `/users/me`.

use axum::extract::State;
use axum::Json;
use blogcraft_core::error::CoreError;
use blogcraft_core::types::DbId;
use blogcraft_core::validation::validate_input;
use blogcraft_db::models::user::{UpdateUser, UserResponse};
use blogcraft_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

fn account_gone(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}

/// GET /api/v1/users/me
pub async fn get_me(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let found = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| account_gone(user.user_id))?;
    Ok(Json(DataResponse { data: found.into() }))
}

/// PUT /api/v1/users/me
///
/// Change the caller's username and/or email. Taken values are a 409.
pub async fn update_me(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let input = input.normalized();
    validate_input(&input)?;

    let updated = UserRepo::update(&state.pool, user.user_id, &input)
        .await?
        .ok_or_else(|| account_gone(user.user_id))?;

    tracing::info!(user_id = updated.id, username = %updated.username, "Profile updated");
    Ok(Json(DataResponse {
        data: updated.into(),
    }))
}
