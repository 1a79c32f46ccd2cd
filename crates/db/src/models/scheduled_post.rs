//! Operator-scheduled post model and DTOs.

use blogcraft_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `scheduled_posts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScheduledPost {
    pub id: DbId,
    pub topic: String,
    pub primary_keyword: String,
    /// Comma-separated.
    pub additional_keywords: String,
    pub scheduled_datetime: Timestamp,
    pub created_by: DbId,
    pub created_at: Timestamp,
}

/// DTO submitted by the scheduling form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateScheduledPost {
    #[validate(length(min = 1, max = 200))]
    pub topic: String,
    #[validate(length(min = 1, max = 100))]
    pub primary_keyword: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub additional_keywords: String,
    pub scheduled_datetime: Timestamp,
}
