use std::sync::Arc;

use blogcraft_core::services::{GrammarChecker, TextGenerator};
use blogcraft_pipeline::publication::PublicationRouter;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: blogcraft_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Hosted text generator used by the authoring workflow.
    pub generator: Arc<dyn TextGenerator>,
    /// Hosted grammar checker.
    pub grammar: Arc<dyn GrammarChecker>,
    /// Routes finished drafts to the local store or the record store.
    pub publisher: Arc<PublicationRouter>,
}
