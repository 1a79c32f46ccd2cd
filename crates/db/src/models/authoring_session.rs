//! Persisted authoring workflow state.

use blogcraft_core::types::{DbId, Timestamp};
use blogcraft_core::workflow::AuthoringSession;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `authoring_sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct AuthoringSessionRow {
    pub user_id: DbId,
    pub state: Json<AuthoringSession>,
    pub updated_at: Timestamp,
}

impl AuthoringSessionRow {
    /// Unwrap the session value, stamping it with the row's `updated_at`.
    pub fn into_session(self) -> AuthoringSession {
        let mut session = self.state.0;
        session.updated_at = Some(self.updated_at);
        session
    }
}
