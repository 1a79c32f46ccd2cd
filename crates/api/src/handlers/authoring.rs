//! Handlers for the `/authoring` workflow.
//!
//! The session value is loaded from `authoring_sessions`, advanced by one
//! action and written back. Workflow failures are part of the normal
//! response: the status stays 200 and the view carries `error` and
//! `error_kind`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use blogcraft_core::publication::PublishTarget;
use blogcraft_core::workflow::{self, Action, AuthoringInputs, AuthoringSession, WorkflowError};
use blogcraft_db::repositories::AuthoringSessionRepo;
use blogcraft_pipeline::publication::Receipt;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Buttons on the authoring page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthoringAction {
    Generate,
    Refine,
    CheckGrammar,
    Publish,
}

impl AuthoringAction {
    /// The tracker action, or `None` for publish.
    fn workflow_action(self) -> Option<Action> {
        match self {
            AuthoringAction::Generate => Some(Action::Generate),
            AuthoringAction::Refine => Some(Action::Refine),
            AuthoringAction::CheckGrammar => Some(Action::CheckGrammar),
            AuthoringAction::Publish => None,
        }
    }
}

/// Request body for `POST /authoring`.
///
/// Form fields that are present replace the stored ones; absent fields keep
/// their previous value.
#[derive(Debug, Deserialize)]
pub struct AuthoringRequest {
    pub action: AuthoringAction,
    pub topic: Option<String>,
    pub primary_keyword: Option<String>,
    pub additional_keywords: Option<String>,
    pub prompts: Option<Vec<String>>,
    pub feedback: Option<String>,
    /// Publish destination (default: `external_scheduled`).
    pub target: Option<PublishTarget>,
    /// `YYYY-MM-DDTHH:MM` (UTC) or RFC 3339.
    pub publish_date: Option<String>,
}

impl AuthoringRequest {
    fn merge_into(&self, inputs: AuthoringInputs) -> AuthoringInputs {
        AuthoringInputs {
            topic: self.topic.clone().unwrap_or(inputs.topic),
            primary_keyword: self.primary_keyword.clone().unwrap_or(inputs.primary_keyword),
            additional_keywords: self
                .additional_keywords
                .clone()
                .unwrap_or(inputs.additional_keywords),
            prompts: self.prompts.clone().unwrap_or(inputs.prompts),
            feedback: self.feedback.clone().unwrap_or(inputs.feedback),
        }
        .normalized()
    }
}

/// Session plus the outcome of the last action.
#[derive(Debug, Serialize)]
pub struct AuthoringView {
    #[serde(flatten)]
    pub session: AuthoringSession,
    /// Stable code of `session.error`, when the last action failed.
    pub error_kind: Option<&'static str>,
    /// Set when the last action published the draft.
    pub receipt: Option<Receipt>,
}

impl AuthoringView {
    fn new(session: AuthoringSession, error: Option<&WorkflowError>, receipt: Option<Receipt>) -> Self {
        Self {
            session,
            error_kind: error.map(WorkflowError::kind),
            receipt,
        }
    }
}

/// GET /api/v1/authoring
pub async fn get_session(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<AuthoringView>>> {
    let session = AuthoringSessionRepo::find(&state.pool, user.user_id)
        .await?
        .unwrap_or_default();
    Ok(Json(DataResponse {
        data: AuthoringView::new(session, None, None),
    }))
}

/// POST /api/v1/authoring
pub async fn submit(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<AuthoringRequest>,
) -> AppResult<Json<DataResponse<AuthoringView>>> {
    let mut session = AuthoringSessionRepo::find(&state.pool, user.user_id)
        .await?
        .unwrap_or_default();
    session.inputs = input.merge_into(std::mem::take(&mut session.inputs));

    let (session, error, receipt) = match input.action.workflow_action() {
        Some(action) => {
            let outcome =
                workflow::advance(action, session, state.generator.as_ref(), state.grammar.as_ref())
                    .await;
            (outcome.session, outcome.error, None)
        }
        None => {
            let outcome = state
                .publisher
                .publish_session(
                    user.user_id,
                    session,
                    input.target.unwrap_or(PublishTarget::ExternalScheduled),
                    input.publish_date.as_deref(),
                    state.grammar.as_ref(),
                )
                .await?;
            (outcome.session, outcome.error, outcome.receipt)
        }
    };

    match &error {
        Some(e) => tracing::info!(
            user_id = user.user_id,
            action = ?input.action,
            kind = e.kind(),
            error = %e,
            "Authoring step failed"
        ),
        None => tracing::debug!(
            user_id = user.user_id,
            action = ?input.action,
            step = session.state.current_step,
            drafts = session.drafts.len(),
            "Authoring step complete"
        ),
    }

    let stored = AuthoringSessionRepo::save(&state.pool, user.user_id, &session).await?;
    Ok(Json(DataResponse {
        data: AuthoringView::new(stored, error.as_ref(), receipt),
    }))
}

/// DELETE /api/v1/authoring
///
/// Discard the session and start over.
pub async fn reset(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<StatusCode> {
    AuthoringSessionRepo::delete(&state.pool, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
