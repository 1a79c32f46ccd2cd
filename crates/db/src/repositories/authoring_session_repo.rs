//! Repository for the `authoring_sessions` table.
//!
//! Writes are last-write-wins per user: two tabs advancing the same
//! workflow overwrite each other.

use blogcraft_core::types::DbId;
use blogcraft_core::workflow::AuthoringSession;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::authoring_session::AuthoringSessionRow;

/// Loads and stores the per-user authoring workflow value.
pub struct AuthoringSessionRepo;

impl AuthoringSessionRepo {
    /// The user's stored session, if any.
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<AuthoringSession>, sqlx::Error> {
        let row = sqlx::query_as::<_, AuthoringSessionRow>(
            "SELECT user_id, state, updated_at FROM authoring_sessions WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(AuthoringSessionRow::into_session))
    }

    /// Insert or replace the user's session, returning it as stored.
    pub async fn save(
        pool: &PgPool,
        user_id: DbId,
        session: &AuthoringSession,
    ) -> Result<AuthoringSession, sqlx::Error> {
        let row = sqlx::query_as::<_, AuthoringSessionRow>(
            "INSERT INTO authoring_sessions (user_id, state, updated_at)
             VALUES ($1, $2, NOW())
             ON CONFLICT (user_id) DO UPDATE SET state = EXCLUDED.state, updated_at = NOW()
             RETURNING user_id, state, updated_at",
        )
        .bind(user_id)
        .bind(Json(session))
        .fetch_one(pool)
        .await?;
        Ok(row.into_session())
    }

    /// Drop the user's session. Returns `true` if one existed.
    pub async fn delete(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM authoring_sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
