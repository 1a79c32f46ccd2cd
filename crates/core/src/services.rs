//! Traits for the hosted services the authoring workflow depends on.
//!
//! Concrete HTTP clients live in `blogcraft-integrations`; the pipeline and
//! API crates only ever hold `Arc<dyn Trait>` so tests can substitute
//! in-memory fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::grammar::GrammarEdit;
use crate::types::Timestamp;

/// Errors from any hosted service call.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The request never produced a response (network, DNS, TLS, timeout).
    #[error("request failed: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status code.
    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// Text generation
// ---------------------------------------------------------------------------

/// A hosted generative-text model.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for a single prompt.
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError>;
}

// ---------------------------------------------------------------------------
// Grammar checking
// ---------------------------------------------------------------------------

/// A hosted grammar checker.
#[async_trait]
pub trait GrammarChecker: Send + Sync {
    /// Check `text` and return the suggested edits in service order.
    async fn check(&self, text: &str, language: &str) -> Result<Vec<GrammarEdit>, ServiceError>;
}

// ---------------------------------------------------------------------------
// Spreadsheet record store
// ---------------------------------------------------------------------------

/// Publication status of an external record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordStatus {
    Scheduled,
    Published,
}

impl RecordStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordStatus::Scheduled => "Scheduled",
            RecordStatus::Published => "Published",
        }
    }
}

/// A new record to push to the external store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalRecord {
    pub title: String,
    pub content: String,
    pub primary_keyword: String,
    pub additional_keywords: String,
    pub seo_summary: String,
    pub publish_date: Timestamp,
    pub status: RecordStatus,
    pub created_at: Timestamp,
}

/// A record read back from the external store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: String,
    pub title: String,
    pub content: String,
}

/// A spreadsheet-like store of blog records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create a record and return the id the store assigned.
    async fn create_record(&self, record: &ExternalRecord) -> Result<String, ServiceError>;

    /// Records with status `Scheduled` whose publish date has passed,
    /// oldest publish date first.
    async fn list_due_scheduled(&self) -> Result<Vec<StoredRecord>, ServiceError>;

    /// Mark a record published and remember the blog platform's post id.
    async fn mark_published(
        &self,
        record_id: &str,
        platform_post_id: &str,
    ) -> Result<(), ServiceError>;
}

// ---------------------------------------------------------------------------
// Blog platform
// ---------------------------------------------------------------------------

/// Post status value understood by the blog platform.
pub const PLATFORM_STATUS_PUBLISH: &str = "publish";

/// Payload for creating a post on the blog platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformPost {
    pub title: String,
    pub content: String,
    pub status: String,
}

/// An external blogging platform.
#[async_trait]
pub trait BlogPlatform: Send + Sync {
    /// Create a post and return the platform-assigned id.
    async fn create_post(&self, post: &PlatformPost) -> Result<String, ServiceError>;
}
