//! Generative text client for the Gemini `generateContent` endpoint.

use async_trait::async_trait;
use blogcraft_core::services::{ServiceError, TextGenerator};
use serde::Deserialize;

use crate::error::{parse_response, IntegrationError};
use crate::{env_or, required_env};

/// Connection settings for the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl GeminiConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var           | Default                                             |
    /// |-------------------|-----------------------------------------------------|
    /// | `GEMINI_API_KEY`  | required                                            |
    /// | `GEMINI_MODEL`    | `gemini-1.5-flash`                                  |
    /// | `GEMINI_BASE_URL` | `https://generativelanguage.googleapis.com/v1beta`  |
    pub fn from_env() -> Self {
        Self {
            api_key: required_env("GEMINI_API_KEY"),
            model: env_or("GEMINI_MODEL", "gemini-1.5-flash"),
            base_url: env_or(
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com/v1beta",
            ),
        }
    }
}

/// HTTP client for a single Gemini model.
pub struct GeminiApi {
    client: reqwest::Client,
    config: GeminiConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

impl GeminiApi {
    pub fn new(config: GeminiConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }

    /// Send one prompt and return the concatenated text of the first candidate.
    pub async fn generate_content(&self, prompt: &str) -> Result<String, IntegrationError> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.config.base_url, self.config.model
            ))
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let parsed: GenerateResponse = parse_response(response).await?;
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().map(|p| p.text).collect())
            .ok_or_else(|| IntegrationError::MissingData("response had no candidates".into()))?;

        tracing::debug!(model = %self.config.model, chars = text.len(), "Gemini generation complete");
        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for GeminiApi {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        Ok(self.generate_content(prompt).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;
    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};

    use super::*;
    use crate::test_server;

    fn config(base_url: String) -> GeminiConfig {
        GeminiConfig {
            api_key: "test-key".into(),
            model: "gemini-test".into(),
            base_url,
        }
    }

    #[tokio::test]
    async fn returns_first_candidate_text() {
        let router = Router::new().route(
            "/models/{action}",
            post(
                |Path(action): Path<String>,
                 Query(query): Query<HashMap<String, String>>,
                 Json(body): Json<serde_json::Value>| async move {
                    assert_eq!(action, "gemini-test:generateContent");
                    assert_eq!(query.get("key").map(String::as_str), Some("test-key"));
                    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
                    Json(serde_json::json!({
                        "candidates": [{
                            "content": { "parts": [{ "text": "# Title\n" }, { "text": prompt }] }
                        }]
                    }))
                },
            ),
        );
        let api = GeminiApi::new(config(test_server::spawn(router).await));

        let text = api.generate("Write about tea").await.unwrap();
        assert_eq!(text, "# Title\nWrite about tea");
    }

    #[tokio::test]
    async fn empty_candidates_is_decode_error() {
        let router = Router::new().route(
            "/models/{action}",
            post(|| async { Json(serde_json::json!({ "candidates": [] })) }),
        );
        let api = GeminiApi::new(config(test_server::spawn(router).await));

        assert_matches!(api.generate("x").await, Err(ServiceError::Decode(_)));
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let router = Router::new().route(
            "/models/{action}",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "quota exceeded") }),
        );
        let api = GeminiApi::new(config(test_server::spawn(router).await));

        assert_matches!(
            api.generate("x").await,
            Err(ServiceError::Status { status: 429, body }) if body == "quota exceeded"
        );
    }
}
