//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use blogcraft_api::auth::jwt::{generate_access_token, JwtConfig};
use blogcraft_api::auth::password::hash_password;
use blogcraft_api::config::ServerConfig;
use blogcraft_api::router::build_app_router;
use blogcraft_api::state::AppState;
use blogcraft_core::grammar::GrammarEdit;
use blogcraft_core::services::{
    ExternalRecord, GrammarChecker, RecordStore, ServiceError, StoredRecord, TextGenerator,
};
use blogcraft_db::models::user::{CreateUser, User};
use blogcraft_db::repositories::UserRepo;
use blogcraft_pipeline::publication::PublicationRouter;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

// ---------------------------------------------------------------------------
// Service fakes
// ---------------------------------------------------------------------------

/// Returns queued responses in order; fails once the queue is empty.
#[derive(Default)]
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
            .unwrap_or_else(|| Err(ServiceError::Transport("no scripted response".into())))
    }
}

/// Grammar checker returning the same edits for every call.
#[derive(Default)]
pub struct FixedGrammar {
    pub edits: Vec<GrammarEdit>,
}

#[async_trait]
impl GrammarChecker for FixedGrammar {
    async fn check(&self, _text: &str, _language: &str) -> Result<Vec<GrammarEdit>, ServiceError> {
        Ok(self.edits.clone())
    }
}

/// Record store keeping created records in memory.
#[derive(Default)]
pub struct MemoryRecordStore {
    pub created: Mutex<Vec<ExternalRecord>>,
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn create_record(&self, record: &ExternalRecord) -> Result<String, ServiceError> {
        let mut created = self.created.lock().unwrap();
        created.push(record.clone());
        Ok(format!("rec{}", created.len()))
    }

    async fn list_due_scheduled(&self) -> Result<Vec<StoredRecord>, ServiceError> {
        Ok(Vec::new())
    }

    async fn mark_published(&self, _record_id: &str, _post_id: &str) -> Result<(), ServiceError> {
        Ok(())
    }
}

/// Fakes wired into a test app, kept so tests can inspect them.
pub struct TestServices {
    pub generator: Arc<ScriptedGenerator>,
    pub grammar: Arc<FixedGrammar>,
    pub records: Arc<MemoryRecordStore>,
}

impl Default for TestServices {
    fn default() -> Self {
        Self {
            generator: Arc::new(ScriptedGenerator::default()),
            grammar: Arc::new(FixedGrammar::default()),
            records: Arc::new(MemoryRecordStore::default()),
        }
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build the full application router with the production middleware stack
/// and the given fakes.
pub fn build_test_app_with(pool: PgPool, services: &TestServices) -> Router {
    let config = test_config();
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        generator: services.generator.clone(),
        grammar: services.grammar.clone(),
        publisher: Arc::new(PublicationRouter::new(pool, services.records.clone())),
    };
    build_app_router(state, &config)
}

/// Build the app with default (empty) fakes.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, &TestServices::default())
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`] directly in the database.
pub async fn create_user(pool: &PgPool, username: &str, role: &str) -> User {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role: role.to_string(),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Access token for `user`, signed with the test secret.
pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.role, &test_config().jwt).expect("token generation")
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

fn builder(method: &str, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header("authorization", format!("Bearer {token}")),
        None => builder,
    }
}

fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    builder(method, uri, token)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, builder("GET", uri, None).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, builder("GET", uri, Some(token)).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request("POST", uri, None, body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request("POST", uri, Some(token), body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request("PUT", uri, Some(token), body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, builder("DELETE", uri, Some(token)).body(Body::empty()).unwrap()).await
}
