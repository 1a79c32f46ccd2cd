//! HTTP-level tests for the operator scheduling endpoints.

mod common;

use axum::http::StatusCode;
use blogcraft_core::roles::ROLE_ADMIN;
use common::{body_json, create_user, delete_auth, get_auth, post_json_auth};
use sqlx::PgPool;

fn schedule_body(topic: &str, when: &str) -> serde_json::Value {
    serde_json::json!({
        "topic": topic,
        "primary_keyword": "tea",
        "additional_keywords": "matcha, sencha",
        "scheduled_datetime": when
    })
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_schedules_and_lists_newest_first(pool: PgPool) {
    let admin = create_user(&pool, "operator", ROLE_ADMIN).await;
    let token = common::token_for(&admin);

    for (topic, when) in [
        ("Early", "2031-01-01T09:00:00Z"),
        ("Late", "2031-06-01T09:00:00Z"),
    ] {
        let response = post_json_auth(
            common::build_test_app(pool.clone()),
            "/api/v1/scheduled-posts",
            schedule_body(topic, when),
            &token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get_auth(common::build_test_app(pool), "/api/v1/scheduled-posts", &token).await;
    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["topic"], "Late");
    assert_eq!(items[0]["created_by"], admin.id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn empty_topic_is_rejected(pool: PgPool) {
    let admin = create_user(&pool, "operator", ROLE_ADMIN).await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/scheduled-posts",
        schedule_body("", "2031-01-01T09:00:00Z"),
        &common::token_for(&admin),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admins_can_only_delete_their_own_rows(pool: PgPool) {
    let first = create_user(&pool, "operator", ROLE_ADMIN).await;
    let second = create_user(&pool, "operator2", ROLE_ADMIN).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/scheduled-posts",
        schedule_body("Mine", "2031-01-01T09:00:00Z"),
        &common::token_for(&first),
    )
    .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/scheduled-posts/{id}");

    let response = delete_auth(common::build_test_app(pool.clone()), &uri, &common::token_for(&second)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(common::build_test_app(pool), &uri, &common::token_for(&first)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
