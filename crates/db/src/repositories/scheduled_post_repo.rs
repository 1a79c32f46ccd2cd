//! Repository for the `scheduled_posts` table.

use blogcraft_core::roles::ROLE_ADMIN;
use blogcraft_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::scheduled_post::{CreateScheduledPost, ScheduledPost};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, topic, primary_keyword, additional_keywords, scheduled_datetime, \
                       created_by, created_at";

/// Provides CRUD operations for scheduled posts.
pub struct ScheduledPostRepo;

impl ScheduledPostRepo {
    /// Insert a new scheduled post owned by `created_by`.
    pub async fn create(
        pool: &PgPool,
        created_by: DbId,
        input: &CreateScheduledPost,
    ) -> Result<ScheduledPost, sqlx::Error> {
        let query = format!(
            "INSERT INTO scheduled_posts
                (topic, primary_keyword, additional_keywords, scheduled_datetime, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScheduledPost>(&query)
            .bind(&input.topic)
            .bind(&input.primary_keyword)
            .bind(&input.additional_keywords)
            .bind(input.scheduled_datetime)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// All scheduled posts, latest schedule first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ScheduledPost>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scheduled_posts ORDER BY scheduled_datetime DESC, id DESC"
        );
        sqlx::query_as::<_, ScheduledPost>(&query)
            .fetch_all(pool)
            .await
    }

    /// Rows due at `now` whose creator is an active admin, oldest first.
    pub async fn list_due_from_admins(
        pool: &PgPool,
        now: Timestamp,
    ) -> Result<Vec<ScheduledPost>, sqlx::Error> {
        let query = format!(
            "SELECT sp.{} FROM scheduled_posts sp
             JOIN users u ON u.id = sp.created_by
             WHERE sp.scheduled_datetime <= $1 AND u.role = $2 AND u.is_active
             ORDER BY sp.scheduled_datetime ASC, sp.id ASC",
            COLUMNS.replace(", ", ", sp.")
        );
        sqlx::query_as::<_, ScheduledPost>(&query)
            .bind(now)
            .bind(ROLE_ADMIN)
            .fetch_all(pool)
            .await
    }

    /// Delete a scheduled post only if `created_by` owns it.
    /// Returns `true` if a row was removed.
    pub async fn delete_owned(
        pool: &PgPool,
        id: DbId,
        created_by: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM scheduled_posts WHERE id = $1 AND created_by = $2")
            .bind(id)
            .bind(created_by)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a scheduled post by ID regardless of owner.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM scheduled_posts WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every row matching the exact keyword triple.
    /// Returns the number of rows removed.
    pub async fn delete_matching(
        conn: &mut PgConnection,
        topic: &str,
        primary_keyword: &str,
        additional_keywords: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM scheduled_posts
             WHERE topic = $1 AND primary_keyword = $2 AND additional_keywords = $3",
        )
        .bind(topic)
        .bind(primary_keyword)
        .bind(additional_keywords)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }
}
