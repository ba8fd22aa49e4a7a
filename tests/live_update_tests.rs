mod common;

use axum::http::StatusCode;
use common::{TestApp, spawn_app};
use newsdesk::models::live_update::NewLiveUpdate;
use serde_json::{Value, json};

async fn post_update(app: &TestApp, token: &str, post_id: &str, content: &str) -> String {
    let response = app
        .post(
            &format!("/api/live-updates/{post_id}"),
            Some(token),
            json!({ "content": content }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    response.data()["id"].as_str().unwrap().to_string()
}

async fn pin(app: &TestApp, token: &str, id: &str, pin: Value) -> common::TestResponse {
    app.put(
        &format!("/api/live-updates/pin/{id}"),
        Some(token),
        json!({ "pin": pin }),
    )
    .await
}

#[tokio::test]
async fn create_attributes_the_caller() {
    let app = spawn_app().await;
    let token = app.editor().await;
    let post = app.published_post().await;

    let response = app
        .post(
            &format!("/api/live-updates/{}", post.id),
            Some(token.as_str()),
            json!({ "title": "Polls open", "content": "Voting has started." }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.data()["postId"], post.id.as_str());
    assert_eq!(response.data()["title"], "Polls open");
    assert_eq!(response.data()["createdBy"], "reporter");
    assert_eq!(response.data()["pinned"], false);
    assert!(response.data()["postedAt"].is_string());

    let response = app
        .post(
            &format!("/api/live-updates/{}", post.id),
            Some(token.as_str()),
            json!({ "content": "Turnout is high.", "createdBy": "Wire desk" }),
        )
        .await;
    assert_eq!(response.data()["createdBy"], "Wire desk");
}

#[tokio::test]
async fn create_checks_post_before_content() {
    let app = spawn_app().await;
    let token = app.editor().await;
    let post = app.published_post().await;

    let response = app
        .post("/api/live-updates/no-such-post", Some(token.as_str()), json!({ "content": "" }))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error(), "Post not found.");

    let response = app
        .post(
            &format!("/api/live-updates/{}", post.id),
            Some(token.as_str()),
            json!({ "content": "   " }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "Update content is required.");

    let response = app
        .post(
            &format!("/api/live-updates/{}", post.id),
            None,
            json!({ "content": "Anonymous" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_is_ordered_by_posting_time() {
    let app = spawn_app().await;
    let post = app.published_post().await;

    for (content, posted_at) in [
        ("second", "2026-03-01T10:05:00.000Z"),
        ("first", "2026-03-01T10:00:00.000Z"),
        ("third", "2026-03-01T10:10:00.000Z"),
    ] {
        app.store()
            .insert_live_update(
                &post.id,
                &NewLiveUpdate {
                    title: None,
                    content: content.to_string(),
                    posted_at: Some(posted_at.to_string()),
                    created_by: None,
                },
            )
            .await
            .unwrap();
    }

    let response = app.get(&format!("/api/live-updates/{}", post.id)).await;
    assert_eq!(response.status, StatusCode::OK);

    let contents: Vec<&str> = response
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["first", "second", "third"]);

    let response = app.get("/api/live-updates/no-such-post").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn at_most_two_updates_are_pinned() {
    let app = spawn_app().await;
    let token = app.editor().await;
    let post = app.published_post().await;

    let a = post_update(&app, &token, &post.id, "a").await;
    let b = post_update(&app, &token, &post.id, "b").await;
    let c = post_update(&app, &token, &post.id, "c").await;

    let response = pin(&app, &token, &a, json!(true)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Update pinned!");
    assert_eq!(response.data()["pinned"], true);

    assert_eq!(pin(&app, &token, &b, json!(true)).await.status, StatusCode::OK);

    let response = pin(&app, &token, &c, json!(true)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "Cannot pin more than 2 updates.");

    // Re-pinning an already pinned update is not refused.
    assert_eq!(pin(&app, &token, &a, json!(true)).await.status, StatusCode::OK);

    let response = pin(&app, &token, &a, json!(false)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Update unpinned!");
    assert_eq!(response.data()["pinned"], false);

    assert_eq!(pin(&app, &token, &c, json!(true)).await.status, StatusCode::OK);
}

#[tokio::test]
async fn pin_limit_is_per_post() {
    let app = spawn_app().await;
    let token = app.editor().await;
    let first = app.published_post().await;
    let second = app.published_post().await;

    for content in ["a", "b"] {
        let id = post_update(&app, &token, &first.id, content).await;
        assert_eq!(pin(&app, &token, &id, json!(true)).await.status, StatusCode::OK);
    }

    let other = post_update(&app, &token, &second.id, "c").await;
    assert_eq!(pin(&app, &token, &other, json!(true)).await.status, StatusCode::OK);
}

#[tokio::test]
async fn pin_accepts_loose_truthiness() {
    let app = spawn_app().await;
    let token = app.editor().await;
    let post = app.published_post().await;
    let id = post_update(&app, &token, &post.id, "a").await;

    let response = pin(&app, &token, &id, json!("yes")).await;
    assert_eq!(response.data()["pinned"], true);

    let response = pin(&app, &token, &id, json!(0)).await;
    assert_eq!(response.data()["pinned"], false);

    let response = pin(&app, &token, &id, json!(1)).await;
    assert_eq!(response.data()["pinned"], true);

    let response = pin(&app, &token, &id, json!("")).await;
    assert_eq!(response.data()["pinned"], false);

    let response = pin(&app, &token, "missing", json!(true)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error(), "Live update not found.");
}

#[tokio::test]
async fn edit_changes_only_given_fields() {
    let app = spawn_app().await;
    let token = app.editor().await;
    let post = app.published_post().await;

    let created = app
        .post(
            &format!("/api/live-updates/{}", post.id),
            Some(token.as_str()),
            json!({ "title": "Draft title", "content": "Original" }),
        )
        .await;
    let id = created.data()["id"].as_str().unwrap();

    let response = app
        .put(
            &format!("/api/live-updates/{id}"),
            Some(token.as_str()),
            json!({ "content": "Corrected" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Live update edited successfully.");
    assert_eq!(response.data()["title"], "Draft title");
    assert_eq!(response.data()["content"], "Corrected");
    assert_eq!(response.data()["pinned"], false);

    let response = app
        .put(
            &format!("/api/live-updates/{id}"),
            Some(token.as_str()),
            json!({ "title": "Final title", "pinned": "true" }),
        )
        .await;
    assert_eq!(response.data()["title"], "Final title");
    assert_eq!(response.data()["content"], "Corrected");
    assert_eq!(response.data()["pinned"], true);

    let response = app
        .put(
            &format!("/api/live-updates/{id}"),
            Some(token.as_str()),
            json!({ "content": "" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .put(
            "/api/live-updates/missing",
            Some(token.as_str()),
            json!({ "content": "Anything" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn refused_pin_leaves_edit_unapplied() {
    let app = spawn_app().await;
    let token = app.editor().await;
    let post = app.published_post().await;

    for content in ["a", "b"] {
        let id = post_update(&app, &token, &post.id, content).await;
        pin(&app, &token, &id, json!(true)).await;
    }
    let id = post_update(&app, &token, &post.id, "c").await;

    let response = app
        .put(
            &format!("/api/live-updates/{id}"),
            Some(token.as_str()),
            json!({ "content": "changed", "pinned": true }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "Cannot pin more than 2 updates.");

    let stored = app.store().get_live_update(&id).await.unwrap().unwrap();
    assert_eq!(stored.content, "c");
    assert!(!stored.pinned);
}

#[tokio::test]
async fn delete_is_admin_only_and_returns_removed_update() {
    let app = spawn_app().await;
    let editor = app.editor().await;
    let admin = app.admin().await;
    let post = app.published_post().await;
    let id = post_update(&app, &editor, &post.id, "To be removed").await;

    let response = app
        .delete(&format!("/api/live-updates/{id}"), Some(editor.as_str()))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .delete(&format!("/api/live-updates/{id}"), Some(admin.as_str()))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Live update deleted successfully.");
    assert_eq!(response.data()["id"], id.as_str());
    assert_eq!(response.data()["content"], "To be removed");

    let response = app
        .delete(&format!("/api/live-updates/{id}"), Some(admin.as_str()))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let listed = app.get(&format!("/api/live-updates/{}", post.id)).await;
    assert!(listed.data().as_array().unwrap().is_empty());
}
