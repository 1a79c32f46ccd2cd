//! Blog post entity model and DTOs.

use blogcraft_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `posts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub date_posted: Timestamp,
    /// `None` once the author account has been deleted.
    pub author_id: Option<DbId>,
    pub seo_keywords: Option<String>,
    pub is_draft: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fields an author submits when writing a post by hand.
///
/// Anything else in the request body is ignored; hand-written posts are
/// always drafts without SEO keywords.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PostForm {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
}

impl PostForm {
    pub fn into_draft(self) -> CreatePost {
        CreatePost {
            title: self.title,
            content: self.content,
            seo_keywords: None,
            is_draft: true,
        }
    }
}

/// DTO for inserting a post.
#[derive(Debug, Clone, Validate)]
pub struct CreatePost {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    #[validate(length(max = 200))]
    pub seo_keywords: Option<String>,
    pub is_draft: bool,
}

/// DTO for updating a post. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePost {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub content: Option<String>,
}

/// One page of posts plus the paging totals.
#[derive(Debug, Clone, Serialize)]
pub struct PostPage {
    pub items: Vec<Post>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
}

impl PostPage {
    pub fn total_pages(&self) -> i64 {
        if self.page_size <= 0 {
            return 0;
        }
        (self.total + self.page_size - 1) / self.page_size
    }
}
