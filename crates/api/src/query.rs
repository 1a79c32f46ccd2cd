//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Posts shown per listing page.
pub const POSTS_PER_PAGE: i64 = 5;

/// `?page=N` for paginated post listings. Pages are 1-based; missing or
/// non-positive values mean the first page.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
}

impl PageParams {
    pub fn page(&self) -> i64 {
        self.page.filter(|p| *p > 0).unwrap_or(1)
    }
}
