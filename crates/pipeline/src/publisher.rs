//! Periodic Publisher: external record store -> blog platform.
//!
//! Every tick lists records that are `Scheduled` with a publish date in the
//! past, posts each one to the blog platform and marks the record
//! `Published`. A failing record is logged and skipped; it stays
//! `Scheduled` and is retried on the next run. There is no compensation if
//! the process dies between posting and marking.

use std::sync::Arc;
use std::time::Duration;

use blogcraft_core::services::{
    BlogPlatform, PlatformPost, RecordStore, ServiceError, StoredRecord, PLATFORM_STATUS_PUBLISH,
};
use tokio_util::sync::CancellationToken;

use crate::run_every;

/// Counts from one publisher run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishRunSummary {
    pub found: usize,
    pub published: usize,
    pub failed: usize,
}

/// Moves due records from the record store onto the blog platform.
pub struct PeriodicPublisher {
    records: Arc<dyn RecordStore>,
    platform: Arc<dyn BlogPlatform>,
}

impl PeriodicPublisher {
    pub fn new(records: Arc<dyn RecordStore>, platform: Arc<dyn BlogPlatform>) -> Self {
        Self { records, platform }
    }

    /// Run every `period` until `cancel` is triggered.
    pub async fn run(&self, period: Duration, cancel: CancellationToken) {
        run_every("periodic_publisher", period, cancel, move || async move {
            // Errors are already logged inside run_once.
            let _ = self.run_once().await;
        })
        .await;
    }

    /// One pass over the due records.
    ///
    /// Returns `Err` only when the listing itself fails, in which case
    /// nothing was published.
    pub async fn run_once(&self) -> Result<PublishRunSummary, ServiceError> {
        let due = match self.records.list_due_scheduled().await {
            Ok(due) => due,
            Err(e) => {
                tracing::error!(error = %e, "Publisher: failed to list scheduled records");
                return Err(e);
            }
        };

        let mut summary = PublishRunSummary {
            found: due.len(),
            ..Default::default()
        };
        tracing::info!(found = summary.found, "Publisher: scheduled records due");

        for record in &due {
            if self.publish_record(record).await {
                summary.published += 1;
            } else {
                summary.failed += 1;
            }
        }

        if summary.found > 0 {
            tracing::info!(
                published = summary.published,
                failed = summary.failed,
                "Publisher: run complete"
            );
        }
        Ok(summary)
    }

    /// Post one record and mark it published. Returns `false` on any failure.
    async fn publish_record(&self, record: &StoredRecord) -> bool {
        let post = PlatformPost {
            title: record.title.clone(),
            content: record.content.clone(),
            status: PLATFORM_STATUS_PUBLISH.to_string(),
        };

        let post_id = match self.platform.create_post(&post).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(record_id = %record.id, error = %e, "Publisher: blog platform rejected post");
                return false;
            }
        };
        tracing::info!(record_id = %record.id, post_id = %post_id, title = %record.title, "Publisher: posted");

        match self.records.mark_published(&record.id, &post_id).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    record_id = %record.id,
                    post_id = %post_id,
                    error = %e,
                    "Publisher: failed to mark record published"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use assert_matches::assert_matches;

    use super::*;
    use crate::fakes::{MemoryPlatform, MemoryRecordStore};

    fn record(id: &str, title: &str) -> StoredRecord {
        StoredRecord {
            id: id.into(),
            title: title.into(),
            content: format!("{title} body"),
        }
    }

    fn store_with(records: Vec<StoredRecord>) -> MemoryRecordStore {
        MemoryRecordStore {
            due: Mutex::new(records),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn publishes_each_due_record_in_order() {
        let store = Arc::new(store_with(vec![record("rec1", "A"), record("rec2", "B")]));
        let platform = Arc::new(MemoryPlatform::default());
        let publisher = PeriodicPublisher::new(store.clone(), platform.clone());

        let summary = publisher.run_once().await.unwrap();

        assert_eq!(
            summary,
            PublishRunSummary {
                found: 2,
                published: 2,
                failed: 0
            }
        );
        let posts = platform.posts.lock().unwrap();
        assert_eq!(posts[0].title, "A");
        assert_eq!(posts[0].status, "publish");
        assert_eq!(posts[1].content, "B body");
        assert_eq!(
            *store.marked.lock().unwrap(),
            vec![
                ("rec1".to_string(), "101".to_string()),
                ("rec2".to_string(), "102".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn platform_failure_skips_to_next_record() {
        let store = Arc::new(store_with(vec![record("rec1", "A"), record("rec2", "B")]));
        let platform = Arc::new(MemoryPlatform {
            reject: vec!["A".into()],
            ..Default::default()
        });
        let publisher = PeriodicPublisher::new(store.clone(), platform);

        let summary = publisher.run_once().await.unwrap();

        assert_eq!(summary.published, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(
            *store.marked.lock().unwrap(),
            vec![("rec2".to_string(), "101".to_string())]
        );
    }

    #[tokio::test]
    async fn mark_failure_counts_as_failed() {
        let mut store = store_with(vec![record("rec1", "A")]);
        store.fail_mark = vec!["rec1".into()];
        let store = Arc::new(store);
        let platform = Arc::new(MemoryPlatform::default());
        let publisher = PeriodicPublisher::new(store.clone(), platform.clone());

        let summary = publisher.run_once().await.unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(platform.posts.lock().unwrap().len(), 1);
        assert!(store.marked.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn listing_failure_aborts_run() {
        let store = Arc::new(MemoryRecordStore {
            fail_list: true,
            ..Default::default()
        });
        let platform = Arc::new(MemoryPlatform::default());
        let publisher = PeriodicPublisher::new(store, platform.clone());

        assert_matches!(publisher.run_once().await, Err(ServiceError::Transport(_)));
        assert!(platform.posts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn run_stops_when_cancelled() {
        let store = Arc::new(store_with(vec![record("rec1", "A")]));
        let platform = Arc::new(MemoryPlatform::default());
        let publisher = PeriodicPublisher::new(store.clone(), platform);
        let cancel = CancellationToken::new();
        cancel.cancel();

        publisher.run(Duration::from_secs(60), cancel).await;
    }
}
