//! Scheduled Post Processor.
//!
//! Operators queue topics with a future `scheduled_datetime`. Once a row is
//! due, an article is generated for it without review and stored as a
//! published post under the operator's name. Rows created by non-admin
//! accounts are ignored.

use std::sync::Arc;
use std::time::Duration;

use blogcraft_core::prompts::scheduled_article_prompt;
use blogcraft_core::publication::{extract_title, seo_keywords, truncate_chars, MAX_TITLE_LENGTH};
use blogcraft_core::services::TextGenerator;
use blogcraft_core::types::{DbId, Timestamp};
use blogcraft_db::models::post::CreatePost;
use blogcraft_db::models::scheduled_post::ScheduledPost;
use blogcraft_db::repositories::{PostRepo, ScheduledPostRepo};
use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::run_every;

/// Counts from one processor run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduledRunSummary {
    pub due: usize,
    pub published: usize,
    pub skipped: usize,
}

/// Converts due scheduled posts into published posts.
pub struct ScheduledPostProcessor {
    pool: PgPool,
    generator: Arc<dyn TextGenerator>,
}

impl ScheduledPostProcessor {
    pub fn new(pool: PgPool, generator: Arc<dyn TextGenerator>) -> Self {
        Self { pool, generator }
    }

    /// Run every `period` until `cancel` is triggered.
    pub async fn run(&self, period: Duration, cancel: CancellationToken) {
        run_every("scheduled_posts", period, cancel, move || async move {
            if let Err(e) = self.run_once(Utc::now()).await {
                tracing::error!(error = %e, "Scheduled posts: run failed");
            }
        })
        .await;
    }

    /// Process every row due at `now`.
    ///
    /// A generation failure skips the row, which is retried next run.
    /// Database errors abort the run.
    pub async fn run_once(&self, now: Timestamp) -> Result<ScheduledRunSummary, sqlx::Error> {
        let due = ScheduledPostRepo::list_due_from_admins(&self.pool, now).await?;
        let mut summary = ScheduledRunSummary {
            due: due.len(),
            ..Default::default()
        };

        for scheduled in &due {
            match self.process(scheduled).await? {
                Some(post_id) => {
                    summary.published += 1;
                    tracing::info!(
                        scheduled_post_id = scheduled.id,
                        post_id,
                        topic = %scheduled.topic,
                        "Scheduled posts: published"
                    );
                }
                None => summary.skipped += 1,
            }
        }

        Ok(summary)
    }

    async fn process(&self, scheduled: &ScheduledPost) -> Result<Option<DbId>, sqlx::Error> {
        let prompt = scheduled_article_prompt(
            &scheduled.topic,
            &scheduled.primary_keyword,
            &scheduled.additional_keywords,
        );

        let content = match self.generator.generate(&prompt).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                tracing::error!(
                    scheduled_post_id = scheduled.id,
                    topic = %scheduled.topic,
                    error = %e,
                    "Scheduled posts: generation failed"
                );
                return Ok(None);
            }
        };

        let title = extract_title(&content, &scheduled.topic);
        let input = CreatePost {
            title: truncate_chars(&title, MAX_TITLE_LENGTH),
            content,
            seo_keywords: Some(seo_keywords(
                &scheduled.primary_keyword,
                &scheduled.additional_keywords,
            )),
            is_draft: false,
        };
        // The row must disappear together with the insert, or the next run
        // would publish the topic a second time.
        let mut tx = self.pool.begin().await?;
        let post = PostRepo::create_in(&mut tx, Some(scheduled.created_by), &input).await?;
        ScheduledPostRepo::delete(&mut tx, scheduled.id).await?;
        tx.commit().await?;

        Ok(Some(post.id))
    }
}
