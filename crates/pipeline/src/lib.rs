//! Publication and background publishing jobs.
//!
//! - [`publication`]: turns a finished draft into a local post or an
//!   external record.
//! - [`publisher`]: moves due external records onto the blog platform.
//! - [`scheduled`]: generates and publishes operator-scheduled posts.

pub mod publication;
pub mod publisher;
pub mod scheduled;

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Default period of both background jobs.
pub const DEFAULT_JOB_INTERVAL: Duration = Duration::from_secs(60);

/// Drive `run_once` on a fixed interval until `cancel` fires.
///
/// Each run is awaited before the next tick, and ticks missed while a run
/// was in flight are skipped, so at most one run is ever active.
pub(crate) async fn run_every<F, Fut>(
    job: &'static str,
    period: Duration,
    cancel: CancellationToken,
    mut run_once: F,
) where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = ()>,
{
    tracing::info!(job, interval_secs = period.as_secs(), "Background job started");

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(job, "Background job stopping");
                break;
            }
            _ = interval.tick() => run_once().await,
        }
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    //! In-memory stand-ins for the hosted services.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use blogcraft_core::grammar::GrammarEdit;
    use blogcraft_core::services::{
        BlogPlatform, ExternalRecord, GrammarChecker, PlatformPost, RecordStore, ServiceError,
        StoredRecord, TextGenerator,
    };

    pub fn unavailable() -> ServiceError {
        ServiceError::Status {
            status: 503,
            body: "unavailable".into(),
        }
    }

    /// Record store that remembers every call.
    #[derive(Default)]
    pub struct MemoryRecordStore {
        pub fail_create: bool,
        pub fail_list: bool,
        /// Record ids whose `mark_published` call fails.
        pub fail_mark: Vec<String>,
        pub due: Mutex<Vec<StoredRecord>>,
        pub created: Mutex<Vec<ExternalRecord>>,
        pub marked: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl RecordStore for MemoryRecordStore {
        async fn create_record(&self, record: &ExternalRecord) -> Result<String, ServiceError> {
            if self.fail_create {
                return Err(unavailable());
            }
            let mut created = self.created.lock().unwrap();
            created.push(record.clone());
            Ok(format!("rec{}", created.len()))
        }

        async fn list_due_scheduled(&self) -> Result<Vec<StoredRecord>, ServiceError> {
            if self.fail_list {
                return Err(ServiceError::Transport("connection refused".into()));
            }
            Ok(self.due.lock().unwrap().clone())
        }

        async fn mark_published(
            &self,
            record_id: &str,
            platform_post_id: &str,
        ) -> Result<(), ServiceError> {
            if self.fail_mark.iter().any(|id| id == record_id) {
                return Err(unavailable());
            }
            self.marked
                .lock()
                .unwrap()
                .push((record_id.to_string(), platform_post_id.to_string()));
            Ok(())
        }
    }

    /// Blog platform that rejects posts whose title is listed in `reject`.
    #[derive(Default)]
    pub struct MemoryPlatform {
        pub reject: Vec<String>,
        pub posts: Mutex<Vec<PlatformPost>>,
    }

    #[async_trait]
    impl BlogPlatform for MemoryPlatform {
        async fn create_post(&self, post: &PlatformPost) -> Result<String, ServiceError> {
            if self.reject.contains(&post.title) {
                return Err(unavailable());
            }
            let mut posts = self.posts.lock().unwrap();
            posts.push(post.clone());
            Ok((100 + posts.len()).to_string())
        }
    }

    /// Returns queued responses in order; errors once the queue is empty.
    pub struct ScriptedGenerator {
        responses: Mutex<VecDeque<Result<String, ServiceError>>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        pub fn new(responses: Vec<Result<String, ServiceError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(unavailable()))
        }
    }

    /// Grammar checker returning fixed edits, or failing when `edits` is `None`.
    pub struct FixedGrammar {
        pub edits: Option<Vec<GrammarEdit>>,
    }

    #[async_trait]
    impl GrammarChecker for FixedGrammar {
        async fn check(
            &self,
            _text: &str,
            _language: &str,
        ) -> Result<Vec<GrammarEdit>, ServiceError> {
            self.edits.clone().ok_or_else(unavailable)
        }
    }
}
