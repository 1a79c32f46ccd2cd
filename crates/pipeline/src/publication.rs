//! Publication Router.
//!
//! Sends a finished draft to one of three destinations: a local `posts`
//! row, an external record marked published now, or an external record
//! with a caller-chosen publish date. [`PublicationRouter::publish_session`]
//! wraps the same routing with the checks the authoring workflow needs.

use std::sync::Arc;

use blogcraft_core::publication::{
    contains_error_marker, extract_title, parse_publish_date, seo_keywords, seo_summary,
    status_for, truncate_chars, PublishTarget, MAX_TITLE_LENGTH,
};
use blogcraft_core::services::{
    ExternalRecord, GrammarChecker, RecordStatus, RecordStore, ServiceError,
};
use blogcraft_core::types::{DbId, Timestamp};
use blogcraft_core::workflow::{grammar_pass, AuthoringSession, WorkflowError};
use blogcraft_db::models::post::CreatePost;
use blogcraft_db::repositories::{PostRepo, ScheduledPostRepo};
use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;

/// Topic and keywords that travel with a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMetadata {
    pub topic: String,
    pub primary_keyword: String,
    pub additional_keywords: String,
}

/// Where a published draft ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "destination", rename_all = "snake_case")]
pub enum Receipt {
    Local {
        post_id: DbId,
    },
    External {
        record_id: String,
        status: RecordStatus,
    },
}

/// Failures of a single publish call.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// Recoverable; shown to the author.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// The local database failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result of [`PublicationRouter::publish_session`].
#[derive(Debug)]
pub struct PublishOutcome {
    pub session: AuthoringSession,
    pub receipt: Option<Receipt>,
    pub error: Option<WorkflowError>,
}

/// A publish target with its date already parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Destination {
    Local,
    External {
        publish_at: Timestamp,
        status: RecordStatus,
    },
}

impl Destination {
    fn resolve(
        target: PublishTarget,
        publish_date: Option<&str>,
        now: Timestamp,
    ) -> Result<Self, WorkflowError> {
        match target {
            PublishTarget::Local => Ok(Destination::Local),
            PublishTarget::ExternalImmediate => Ok(Destination::External {
                publish_at: now,
                status: RecordStatus::Published,
            }),
            PublishTarget::ExternalScheduled => {
                let raw = publish_date
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .ok_or_else(|| {
                        WorkflowError::Validation("Please provide a publish date and time.".into())
                    })?;
                let publish_at = parse_publish_date(raw)?;
                Ok(Destination::External {
                    publish_at,
                    status: status_for(publish_at, now),
                })
            }
        }
    }
}

/// Routes drafts to the local store or the external record store.
pub struct PublicationRouter {
    pool: PgPool,
    records: Arc<dyn RecordStore>,
}

impl PublicationRouter {
    pub fn new(pool: PgPool, records: Arc<dyn RecordStore>) -> Self {
        Self { pool, records }
    }

    /// Publish `draft` to `target`.
    ///
    /// `publish_date` is only read for [`PublishTarget::ExternalScheduled`],
    /// where it is required.
    pub async fn publish(
        &self,
        author_id: DbId,
        draft: &str,
        metadata: &PostMetadata,
        target: PublishTarget,
        publish_date: Option<&str>,
        now: Timestamp,
    ) -> Result<Receipt, PublishError> {
        let destination = Destination::resolve(target, publish_date, now)?;
        self.publish_to(author_id, draft, metadata, destination, now)
            .await
    }

    async fn publish_to(
        &self,
        author_id: DbId,
        draft: &str,
        metadata: &PostMetadata,
        destination: Destination,
        now: Timestamp,
    ) -> Result<Receipt, PublishError> {
        let title = extract_title(draft, &metadata.topic);

        match destination {
            Destination::Local => self.publish_local(author_id, &title, draft, metadata).await,
            Destination::External { publish_at, status } => {
                self.publish_external(&title, draft, metadata, publish_at, status, now)
                    .await
            }
        }
    }

    /// Insert the post and drop matching scheduled rows in one transaction.
    async fn publish_local(
        &self,
        author_id: DbId,
        title: &str,
        draft: &str,
        metadata: &PostMetadata,
    ) -> Result<Receipt, PublishError> {
        let input = CreatePost {
            title: truncate_chars(title, MAX_TITLE_LENGTH),
            content: draft.to_string(),
            seo_keywords: Some(seo_keywords(
                &metadata.primary_keyword,
                &metadata.additional_keywords,
            )),
            is_draft: false,
        };

        let mut tx = self.pool.begin().await?;
        let post = PostRepo::create_in(&mut tx, Some(author_id), &input).await?;
        let removed = ScheduledPostRepo::delete_matching(
            &mut tx,
            &metadata.topic,
            &metadata.primary_keyword,
            &metadata.additional_keywords,
        )
        .await?;
        tx.commit().await?;

        tracing::info!(post_id = post.id, author_id, removed_scheduled = removed, "Published local post");
        Ok(Receipt::Local { post_id: post.id })
    }

    async fn publish_external(
        &self,
        title: &str,
        draft: &str,
        metadata: &PostMetadata,
        publish_date: Timestamp,
        status: RecordStatus,
        now: Timestamp,
    ) -> Result<Receipt, PublishError> {
        let record = ExternalRecord {
            title: title.to_string(),
            content: draft.to_string(),
            primary_keyword: metadata.primary_keyword.clone(),
            additional_keywords: metadata.additional_keywords.clone(),
            seo_summary: seo_summary(title, &metadata.primary_keyword),
            publish_date,
            status,
            created_at: now,
        };

        let record_id = self
            .records
            .create_record(&record)
            .await
            .map_err(external_write_error)?;

        tracing::info!(record_id = %record_id, status = status.as_str(), "Sent draft to record store");
        Ok(Receipt::External { record_id, status })
    }

    /// Publish the session's current draft.
    ///
    /// The target and publish date are validated before any service is
    /// called. A draft that was never grammar checked then gets one
    /// best-effort pass; a failing pass is noted on the session but does
    /// not stop the publish. Success resets the session. Workflow failures leave the
    /// session as it was apart from `error`. Only database failures are
    /// returned as `Err`.
    pub async fn publish_session(
        &self,
        author_id: DbId,
        mut session: AuthoringSession,
        target: PublishTarget,
        publish_date: Option<&str>,
        grammar: &dyn GrammarChecker,
    ) -> Result<PublishOutcome, sqlx::Error> {
        session.error = None;

        let Some(current) = session.current_draft() else {
            return Ok(failed(
                session,
                WorkflowError::Validation("No content generated to publish.".into()),
            ));
        };
        if contains_error_marker(&current.content) {
            return Ok(failed(
                session,
                WorkflowError::Validation("Cannot publish due to previous errors.".into()),
            ));
        }

        let mut draft = current.content.clone();

        let now = Utc::now();
        let destination = match Destination::resolve(target, publish_date, now) {
            Ok(destination) => destination,
            Err(e) => return Ok(failed(session, e)),
        };

        if !session.state.grammar_checked {
            match grammar_pass(&draft, grammar).await {
                Ok(pass) => {
                    tracing::debug!(edits = pass.edit_count, "Grammar pass before publish");
                    draft = pass.text;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Grammar pass before publish failed");
                    session.error = Some(format!("Grammar check failed: {e}"));
                }
            }
        }

        let metadata = PostMetadata {
            topic: session.inputs.topic.clone(),
            primary_keyword: session.inputs.primary_keyword.clone(),
            additional_keywords: session.inputs.additional_keywords.clone(),
        };

        match self
            .publish_to(author_id, &draft, &metadata, destination, now)
            .await
        {
            Ok(receipt) => {
                session.reset();
                Ok(PublishOutcome {
                    session,
                    receipt: Some(receipt),
                    error: None,
                })
            }
            Err(PublishError::Workflow(e)) => Ok(failed(session, e)),
            Err(PublishError::Database(e)) => Err(e),
        }
    }
}

fn failed(mut session: AuthoringSession, error: WorkflowError) -> PublishOutcome {
    session.error = Some(error.to_string());
    PublishOutcome {
        session,
        receipt: None,
        error: Some(error),
    }
}

fn external_write_error(err: ServiceError) -> WorkflowError {
    tracing::error!(error = %err, "Record store write failed");
    let message = match err {
        ServiceError::Status { body, .. } => format!("Failed to schedule blog in Airtable: {body}"),
        other => format!("Error sending to Airtable: {other}"),
    };
    WorkflowError::ExternalWrite(message)
}
