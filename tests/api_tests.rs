mod common;

use axum::http::{Method, StatusCode};
use common::spawn_app;

#[tokio::test]
async fn test_root_reports_running() {
    let app = spawn_app().await;

    let response = app.get("/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "Newsdesk API is running");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = spawn_app().await;

    let response = app.get("/api/does-not-exist").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_public_listings_need_no_token() {
    let app = spawn_app().await;

    for uri in [
        "/api/categories/list-categories",
        "/api/tags/list-tags",
        "/api/tags/trending-tags",
    ] {
        let response = app.get(uri).await;
        assert_eq!(response.status, StatusCode::OK, "{uri}");
        assert_eq!(response.body["success"], true);
        assert!(response.data().as_array().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_error_envelope() {
    let app = spawn_app().await;

    let response = app.get("/api/tags/unknown-tag").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["success"], false);
    assert!(response.body["error"].is_string());
    assert!(response.body.get("data").is_none());
}

#[tokio::test]
async fn test_metrics_requires_admin() {
    let app = spawn_app().await;
    let editor = app.editor().await;
    let admin = app.admin().await;

    let response = app.get("/api/metrics").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .send(Method::GET, "/api/metrics", Some(editor.as_str()), None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .send(Method::GET, "/api/metrics", Some(admin.as_str()), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_non_object_body_is_rejected() {
    let app = spawn_app().await;
    let editor = app.editor().await;

    let response = app
        .send(
            Method::POST,
            "/api/tags/add-tag",
            Some(editor.as_str()),
            Some(serde_json::json!("not an object")),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
    assert!(response.body["error"].is_string());
}

#[tokio::test]
async fn test_mistyped_field_keeps_the_envelope() {
    let app = spawn_app().await;
    let editor = app.editor().await;

    let response = app
        .post(
            "/api/tags/add-tag",
            Some(editor.as_str()),
            serde_json::json!({ "name": "Budget", "isTrending": "true" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
    assert!(response.error().starts_with("Invalid request body"));
}

#[tokio::test]
async fn test_oversized_id_is_not_found() {
    let app = spawn_app().await;
    let long_id = "x".repeat(65);

    let response = app.get(&format!("/api/tags/{long_id}")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error(), "Tag not found");

    let response = app.get(&format!("/api/categories/{long_id}")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app.get(&format!("/api/live-updates/{long_id}")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error(), "Post not found.");
}
