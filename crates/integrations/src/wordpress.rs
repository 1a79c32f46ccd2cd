//! Blog platform client for the WordPress REST API.

use async_trait::async_trait;
use blogcraft_core::services::{BlogPlatform, PlatformPost, ServiceError};
use serde::Deserialize;

use crate::error::{parse_response, IntegrationError};
use crate::required_env;

/// Credentials and endpoint for a WordPress site.
#[derive(Debug, Clone)]
pub struct WordPressConfig {
    /// Full posts endpoint, e.g. `https://example.com/wp-json/wp/v2/posts`.
    pub posts_url: String,
    pub username: String,
    /// Application password.
    pub password: String,
}

impl WordPressConfig {
    /// Load `WORDPRESS_URL`, `WORDPRESS_USERNAME` and `WORDPRESS_PASSWORD`.
    /// All three are required.
    pub fn from_env() -> Self {
        Self {
            posts_url: required_env("WORDPRESS_URL"),
            username: required_env("WORDPRESS_USERNAME"),
            password: required_env("WORDPRESS_PASSWORD"),
        }
    }
}

/// HTTP client for one WordPress site.
pub struct WordPressApi {
    client: reqwest::Client,
    config: WordPressConfig,
}

#[derive(Debug, Deserialize)]
struct CreatedPost {
    id: serde_json::Value,
}

impl WordPressApi {
    pub fn new(config: WordPressConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create a post with HTTP basic auth and return its id as text.
    pub async fn publish(&self, post: &PlatformPost) -> Result<String, IntegrationError> {
        let response = self
            .client
            .post(&self.config.posts_url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .json(post)
            .send()
            .await?;

        let created: CreatedPost = parse_response(response).await?;
        match created.id {
            serde_json::Value::Number(n) => Ok(n.to_string()),
            serde_json::Value::String(s) => Ok(s),
            other => Err(IntegrationError::MissingData(format!(
                "unexpected post id {other}"
            ))),
        }
    }
}

#[async_trait]
impl BlogPlatform for WordPressApi {
    async fn create_post(&self, post: &PlatformPost) -> Result<String, ServiceError> {
        Ok(self.publish(post).await?)
    }
}
