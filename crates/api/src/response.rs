//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Use [`DataResponse`]
//! instead of ad-hoc `serde_json::json!({ "data": ... })`.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// One page of a listing plus the paging totals.
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    pub data: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl From<blogcraft_db::models::post::PostPage> for PageResponse<blogcraft_db::models::post::Post> {
    fn from(page: blogcraft_db::models::post::PostPage) -> Self {
        let total_pages = page.total_pages();
        Self {
            data: page.items,
            page: page.page,
            page_size: page.page_size,
            total: page.total,
            total_pages,
        }
    }
}
