//! Grammar checking through the LanguageTool `/v2/check` endpoint.

use async_trait::async_trait;
use blogcraft_core::grammar::GrammarEdit;
use blogcraft_core::services::{GrammarChecker, ServiceError};
use serde::Deserialize;

use crate::env_or;
use crate::error::{parse_response, IntegrationError};

/// Public LanguageTool endpoint.
pub const DEFAULT_CHECK_URL: &str = "https://api.languagetool.org/v2/check";

/// HTTP client for a LanguageTool server.
pub struct LanguageToolApi {
    client: reqwest::Client,
    check_url: String,
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<Match>,
}

#[derive(Debug, Deserialize)]
struct Match {
    offset: usize,
    length: usize,
    #[serde(default)]
    replacements: Vec<Replacement>,
}

#[derive(Debug, Deserialize)]
struct Replacement {
    value: String,
}

impl From<Match> for GrammarEdit {
    /// Only the first suggested replacement is kept.
    fn from(m: Match) -> Self {
        GrammarEdit {
            offset: m.offset,
            length: m.length,
            replacement: m.replacements.into_iter().next().map(|r| r.value),
        }
    }
}

impl LanguageToolApi {
    /// * `check_url` - Full URL of the check endpoint.
    pub fn new(check_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            check_url,
        }
    }

    /// Build a client from `LANGUAGETOOL_URL`, defaulting to the public server.
    pub fn from_env() -> Self {
        Self::new(env_or("LANGUAGETOOL_URL", DEFAULT_CHECK_URL))
    }

    /// Submit `text` for checking and return one edit per reported match.
    pub async fn check_text(
        &self,
        text: &str,
        language: &str,
    ) -> Result<Vec<GrammarEdit>, IntegrationError> {
        let response = self
            .client
            .post(&self.check_url)
            .form(&[("text", text), ("language", language)])
            .send()
            .await?;

        let parsed: CheckResponse = parse_response(response).await?;
        tracing::debug!(matches = parsed.matches.len(), "LanguageTool check complete");
        Ok(parsed.matches.into_iter().map(GrammarEdit::from).collect())
    }
}

#[async_trait]
impl GrammarChecker for LanguageToolApi {
    async fn check(&self, text: &str, language: &str) -> Result<Vec<GrammarEdit>, ServiceError> {
        Ok(self.check_text(text, language).await?)
    }
}
