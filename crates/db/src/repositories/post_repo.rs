//! Repository for the `posts` table.

use blogcraft_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::post::{CreatePost, Post, PostPage, UpdatePost};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, content, date_posted, author_id, seo_keywords, is_draft, \
                       created_at, updated_at";

/// Provides CRUD operations for posts.
pub struct PostRepo;

impl PostRepo {
    /// Insert a new post owned by `author_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        author_id: Option<DbId>,
        input: &CreatePost,
    ) -> Result<Post, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::create_in(&mut conn, author_id, input).await
    }

    /// Same as [`PostRepo::create`] on an existing connection, so the
    /// insert can join a caller's transaction.
    pub async fn create_in(
        conn: &mut PgConnection,
        author_id: Option<DbId>,
        input: &CreatePost,
    ) -> Result<Post, sqlx::Error> {
        let query = format!(
            "INSERT INTO posts (title, content, author_id, seo_keywords, is_draft)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(&input.title)
            .bind(&input.content)
            .bind(author_id)
            .bind(&input.seo_keywords)
            .bind(input.is_draft)
            .fetch_one(conn)
            .await
    }

    /// Find a post by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE id = $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of posts, newest first. `page` is 1-based.
    pub async fn list_page(
        pool: &PgPool,
        page: i64,
        page_size: i64,
    ) -> Result<PostPage, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM posts ORDER BY date_posted DESC, id DESC LIMIT $1 OFFSET $2"
        );
        let items = sqlx::query_as::<_, Post>(&query)
            .bind(page_size)
            .bind(offset(page, page_size))
            .fetch_all(pool)
            .await?;
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(pool)
            .await?;
        Ok(PostPage {
            items,
            page,
            page_size,
            total,
        })
    }

    /// One page of a single author's posts, newest first.
    pub async fn list_page_by_author(
        pool: &PgPool,
        author_id: DbId,
        page: i64,
        page_size: i64,
    ) -> Result<PostPage, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM posts WHERE author_id = $1
             ORDER BY date_posted DESC, id DESC LIMIT $2 OFFSET $3"
        );
        let items = sqlx::query_as::<_, Post>(&query)
            .bind(author_id)
            .bind(page_size)
            .bind(offset(page, page_size))
            .fetch_all(pool)
            .await?;
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(pool)
            .await?;
        Ok(PostPage {
            items,
            page,
            page_size,
            total,
        })
    }

    /// The `limit` most recently posted rows, for the sidebar.
    pub async fn list_latest(pool: &PgPool, limit: i64) -> Result<Vec<Post>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM posts ORDER BY date_posted DESC, id DESC LIMIT $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Update a post. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePost,
    ) -> Result<Option<Post>, sqlx::Error> {
        let query = format!(
            "UPDATE posts SET
                title = COALESCE($2, title),
                content = COALESCE($3, content)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.content)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a post by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Rows to skip for a 1-based `page`. Pages past `i64::MAX` rows saturate,
/// which simply yields an empty page.
fn offset(page: i64, page_size: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(page_size.max(0))
}
