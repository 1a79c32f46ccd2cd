//! Spreadsheet record store backed by the Airtable REST API.
//!
//! Records live in one table. Field names are the human-readable column
//! titles used by the editorial base (`Title`, `Publish Date`, ...).

use async_trait::async_trait;
use blogcraft_core::publication::format_external_timestamp;
use blogcraft_core::services::{
    ExternalRecord, RecordStatus, RecordStore, ServiceError, StoredRecord,
};
use reqwest::Url;
use serde::Deserialize;

use crate::error::{ensure_success, parse_response, IntegrationError};
use crate::{env_or, required_env};

/// Formula selecting records that are due for publication.
pub const DUE_SCHEDULED_FORMULA: &str = r#"AND({Status} = "Scheduled", {Publish Date} <= NOW())"#;

const FIELD_TITLE: &str = "Title";
const FIELD_CONTENT: &str = "Content";
const FIELD_PUBLISH_DATE: &str = "Publish Date";
const FIELD_STATUS: &str = "Status";
const FIELD_PLATFORM_POST_ID: &str = "WordPress Post ID";

/// Connection settings for one Airtable table.
#[derive(Debug, Clone)]
pub struct AirtableConfig {
    pub api_key: String,
    pub base_id: String,
    pub table_name: String,
    pub base_url: String,
}

impl AirtableConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var               | Default                       |
    /// |-----------------------|-------------------------------|
    /// | `AIRTABLE_API_KEY`    | required                      |
    /// | `AIRTABLE_BASE_ID`    | required                      |
    /// | `AIRTABLE_TABLE_NAME` | `Blog Posts`                  |
    /// | `AIRTABLE_BASE_URL`   | `https://api.airtable.com/v0` |
    pub fn from_env() -> Self {
        Self {
            api_key: required_env("AIRTABLE_API_KEY"),
            base_id: required_env("AIRTABLE_BASE_ID"),
            table_name: env_or("AIRTABLE_TABLE_NAME", "Blog Posts"),
            base_url: env_or("AIRTABLE_BASE_URL", "https://api.airtable.com/v0"),
        }
    }
}

/// HTTP client for an Airtable table.
pub struct AirtableApi {
    client: reqwest::Client,
    config: AirtableConfig,
}

#[derive(Debug, Deserialize)]
struct RecordList {
    #[serde(default)]
    records: Vec<RecordItem>,
    /// Present when more pages follow.
    offset: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecordItem {
    id: String,
    #[serde(default)]
    fields: RecordFields,
}

#[derive(Debug, Default, Deserialize)]
struct RecordFields {
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Content", default)]
    content: String,
}

impl AirtableApi {
    pub fn new(config: AirtableConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// `{base_url}/{base_id}/{table}[/{record_id}]` with every segment escaped.
    fn table_url(&self, record_id: Option<&str>) -> Result<Url, IntegrationError> {
        let mut url = Url::parse(&self.config.base_url).map_err(|e| {
            IntegrationError::MissingData(format!("invalid Airtable base URL: {e}"))
        })?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                IntegrationError::MissingData("Airtable base URL cannot take a path".into())
            })?;
            segments
                .pop_if_empty()
                .push(&self.config.base_id)
                .push(&self.config.table_name);
            if let Some(id) = record_id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    /// Create one record and return its id.
    pub async fn create(&self, record: &ExternalRecord) -> Result<String, IntegrationError> {
        let body = serde_json::json!({
            "records": [{ "fields": record_fields(record) }],
        });

        let response = self
            .client
            .post(self.table_url(None)?)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let created: RecordList = parse_response(response).await?;
        let id = created
            .records
            .into_iter()
            .next()
            .map(|r| r.id)
            .ok_or_else(|| IntegrationError::MissingData("no record in create response".into()))?;

        tracing::info!(record_id = %id, status = record.status.as_str(), "Airtable record created");
        Ok(id)
    }

    /// All due scheduled records, following pagination.
    pub async fn list_due(&self) -> Result<Vec<StoredRecord>, IntegrationError> {
        let url = self.table_url(None)?;
        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut query: Vec<(&str, &str)> = vec![
                ("filterByFormula", DUE_SCHEDULED_FORMULA),
                ("sort[0][field]", FIELD_PUBLISH_DATE),
                ("sort[0][direction]", "asc"),
            ];
            if let Some(ref token) = offset {
                query.push(("offset", token.as_str()));
            }

            let response = self
                .client
                .get(url.clone())
                .bearer_auth(&self.config.api_key)
                .query(&query)
                .send()
                .await?;

            let page: RecordList = parse_response(response).await?;
            records.extend(page.records.into_iter().map(|item| StoredRecord {
                id: item.id,
                title: item.fields.title,
                content: item.fields.content,
            }));

            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        Ok(records)
    }

    /// Set `Status = Published` and store the platform post id.
    pub async fn update_published(
        &self,
        record_id: &str,
        platform_post_id: &str,
    ) -> Result<(), IntegrationError> {
        let body = serde_json::json!({
            "fields": {
                FIELD_PLATFORM_POST_ID: platform_post_id,
                FIELD_STATUS: RecordStatus::Published.as_str(),
            }
        });

        let response = self
            .client
            .patch(self.table_url(Some(record_id))?)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }
}

fn record_fields(record: &ExternalRecord) -> serde_json::Value {
    serde_json::json!({
        FIELD_TITLE: record.title,
        FIELD_CONTENT: record.content,
        "Primary Keyword": record.primary_keyword,
        "Additional Keywords": record.additional_keywords,
        "SEO Summary": record.seo_summary,
        FIELD_PUBLISH_DATE: format_external_timestamp(record.publish_date),
        FIELD_STATUS: record.status.as_str(),
        "Created At": format_external_timestamp(record.created_at),
    })
}

#[async_trait]
impl RecordStore for AirtableApi {
    async fn create_record(&self, record: &ExternalRecord) -> Result<String, ServiceError> {
        Ok(self.create(record).await?)
    }

    async fn list_due_scheduled(&self) -> Result<Vec<StoredRecord>, ServiceError> {
        Ok(self.list_due().await?)
    }

    async fn mark_published(
        &self,
        record_id: &str,
        platform_post_id: &str,
    ) -> Result<(), ServiceError> {
        Ok(self.update_published(record_id, platform_post_id).await?)
    }
}
