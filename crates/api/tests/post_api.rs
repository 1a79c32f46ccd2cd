//! HTTP-level tests for the post CRUD and listing endpoints.

mod common;

use axum::http::StatusCode;
use blogcraft_core::roles::ROLE_AUTHOR;
use blogcraft_db::models::post::CreatePost;
use blogcraft_db::repositories::PostRepo;
use common::{body_json, create_user, delete_auth, get, post_json, post_json_auth, put_json_auth};
use sqlx::PgPool;

async fn seed_posts(pool: &PgPool, author_id: i64, count: usize) {
    for i in 1..=count {
        let input = CreatePost {
            title: format!("Post {i}"),
            content: format!("Body {i}"),
            seo_keywords: None,
            is_draft: false,
        };
        PostRepo::create(pool, Some(author_id), &input).await.unwrap();
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_post_defaults_to_draft(pool: PgPool) {
    let author = create_user(&pool, "writer", ROLE_AUTHOR).await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/posts",
        serde_json::json!({ "title": "Hello", "content": "World" }),
        &common::token_for(&author),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Hello");
    assert_eq!(json["data"]["is_draft"], true);
    assert_eq!(json["data"]["author_id"], author.id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_post_cannot_skip_draft_state(pool: PgPool) {
    let author = create_user(&pool, "writer", ROLE_AUTHOR).await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/posts",
        serde_json::json!({
            "title": "T",
            "content": "C",
            "is_draft": false,
            "seo_keywords": "spam"
        }),
        &common::token_for(&author),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["is_draft"], true);
    assert!(json["data"]["seo_keywords"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_post_requires_auth(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/posts",
        serde_json::json!({ "title": "Hello", "content": "World" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_post_rejects_long_title(pool: PgPool) {
    let author = create_user(&pool, "writer", ROLE_AUTHOR).await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/posts",
        serde_json::json!({ "title": "x".repeat(101), "content": "World" }),
        &common::token_for(&author),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_is_paginated_newest_first(pool: PgPool) {
    let author = create_user(&pool, "writer", ROLE_AUTHOR).await;
    seed_posts(&pool, author.id, 7).await;

    let response = get(common::build_test_app(pool.clone()), "/api/v1/posts").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 5);
    assert_eq!(json["data"][0]["title"], "Post 7");
    assert_eq!(json["total"], 7);
    assert_eq!(json["total_pages"], 2);

    let response = get(common::build_test_app(pool), "/api/v1/posts?page=2").await;
    let json = body_json(response).await;
    assert_eq!(json["page"], 2);
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
    assert_eq!(json["data"][1]["title"], "Post 1");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn out_of_range_page_is_empty(pool: PgPool) {
    let author = create_user(&pool, "writer", ROLE_AUTHOR).await;
    seed_posts(&pool, author.id, 2).await;

    let response = get(
        common::build_test_app(pool.clone()),
        "/api/v1/posts?page=4611686018427387904",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"], serde_json::json!([]));
    assert_eq!(json["total"], 2);

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/users/writer/posts?page={}", i64::MAX),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], serde_json::json!([]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn latest_returns_five(pool: PgPool) {
    let author = create_user(&pool, "writer", ROLE_AUTHOR).await;
    seed_posts(&pool, author.id, 6).await;

    let response = get(common::build_test_app(pool), "/api/v1/posts/latest").await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 5);
    assert_eq!(json["data"][0]["title"], "Post 6");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_post_is_404(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/posts/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn only_author_can_update_or_delete(pool: PgPool) {
    let owner = create_user(&pool, "owner", ROLE_AUTHOR).await;
    let other = create_user(&pool, "other", ROLE_AUTHOR).await;
    seed_posts(&pool, owner.id, 1).await;
    let id = PostRepo::list_latest(&pool, 1).await.unwrap()[0].id;
    let uri = format!("/api/v1/posts/{id}");

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        serde_json::json!({ "title": "Hijacked" }),
        &common::token_for(&other),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(common::build_test_app(pool.clone()), &uri, &common::token_for(&other)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        serde_json::json!({ "title": "Renamed" }),
        &common::token_for(&owner),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Renamed");
    assert_eq!(json["data"]["content"], "Body 1");

    let response = delete_auth(common::build_test_app(pool.clone()), &uri, &common::token_for(&owner)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(common::build_test_app(pool), &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn user_listing_filters_by_author(pool: PgPool) {
    let alice = create_user(&pool, "alice", ROLE_AUTHOR).await;
    let bob = create_user(&pool, "bob", ROLE_AUTHOR).await;
    seed_posts(&pool, alice.id, 2).await;
    seed_posts(&pool, bob.id, 3).await;

    let response = get(common::build_test_app(pool.clone()), "/api/v1/users/alice/posts").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 2);
    assert!(json["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|p| p["author_id"] == alice.id));

    let response = get(common::build_test_app(pool), "/api/v1/users/nobody/posts").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
