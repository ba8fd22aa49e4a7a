mod common;

use axum::http::StatusCode;
use common::{spawn_app, spawn_app_with};
use futures::future::join_all;
use serde_json::json;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_pins_never_exceed_the_cap() {
    let app = spawn_app().await;
    let token = app.editor().await;
    let post = app.published_post().await;

    let mut ids = Vec::new();
    for content in ["a", "b", "c", "d", "e", "f"] {
        let response = app
            .post(
                &format!("/api/live-updates/{}", post.id),
                Some(token.as_str()),
                json!({ "content": content }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        ids.push(response.data()["id"].as_str().unwrap().to_string());
    }

    let uris: Vec<String> = ids
        .iter()
        .map(|id| format!("/api/live-updates/pin/{id}"))
        .collect();
    let responses = join_all(uris.iter().map(|uri| {
        app.put(
            uri,
            Some(token.as_str()),
            json!({ "pin": true }),
        )
    }))
    .await;

    let pinned = responses
        .iter()
        .filter(|r| r.status == StatusCode::OK)
        .count();
    let refused: Vec<_> = responses
        .iter()
        .filter(|r| r.status == StatusCode::BAD_REQUEST)
        .collect();
    assert_eq!(pinned, 2);
    assert_eq!(refused.len(), 4);
    assert!(
        refused
            .iter()
            .all(|r| r.error() == "Cannot pin more than 2 updates.")
    );

    let stored = app.store().list_live_updates(&post.id).await.unwrap();
    assert_eq!(stored.iter().filter(|u| u.pinned).count(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_bad_logins_are_all_counted() {
    let app = spawn_app_with(|config| {
        config.security.login_rate_limit.max_requests = 100;
    })
    .await;
    let (user, _) = app.create_user("desk", "editor").await;

    let responses = join_all((0..8).map(|_| app.login("desk", "wrong-password"))).await;

    let rejected = responses
        .iter()
        .filter(|r| r.status == StatusCode::UNAUTHORIZED)
        .count();
    let locked_out = responses
        .iter()
        .filter(|r| r.status == StatusCode::FORBIDDEN)
        .count();
    assert_eq!(rejected + locked_out, 8);
    assert!(rejected >= 5);

    let stored = app.store().get_user_by_id(&user.id).await.unwrap().unwrap();
    assert_eq!(stored.failed_attempts, i32::try_from(rejected).unwrap());
    assert!(stored.lock_until.is_some());
}
