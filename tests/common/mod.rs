//! Shared harness for the HTTP integration tests.
#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use newsdesk::api::AppState;
use newsdesk::config::Config;
use newsdesk::constants::posts::STATUS_PUBLISHED;
use newsdesk::models::post::{NewPost, Post};
use newsdesk::models::user::{NewUser, User};
use serde_json::Value;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

pub const PASSWORD: &str = "correct-horse";

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    db_path: PathBuf,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }

    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

pub async fn spawn_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let db_path =
        std::env::temp_dir().join(format!("newsdesk-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}?mode=rwc", db_path.display());
    config.security.jwt_secret = "test-secret".to_string();
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config.observability.metrics_enabled = false;
    configure(&mut config);

    let state = newsdesk::api::create_app_state_from_config(config, None)
        .await
        .expect("failed to create app state");
    let router = newsdesk::api::router(state.clone()).await;

    TestApp {
        router,
        state,
        db_path,
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_path);
    }
}

impl TestApp {
    pub fn store(&self) -> &newsdesk::db::Store {
        self.state.store()
    }

    /// Creates an account with [`PASSWORD`] and returns it with a fresh token.
    pub async fn create_user(&self, username: &str, role: &str) -> (User, String) {
        let security = self.state.config().read().await.security.clone();
        let user = self
            .store()
            .create_user(
                &NewUser {
                    username: username.to_string(),
                    email: format!("{username}@example.com"),
                    password: PASSWORD.to_string(),
                    role: role.to_string(),
                    first_name: None,
                    last_name: None,
                },
                &security,
            )
            .await
            .expect("failed to create user");
        let token = self.state.tokens().issue(&user).expect("failed to issue token");
        (user, token)
    }

    pub async fn admin(&self) -> String {
        self.create_user("chief", "admin").await.1
    }

    pub async fn editor(&self) -> String {
        self.create_user("reporter", "editor").await.1
    }

    pub async fn seed_post(
        &self,
        category_id: Option<&str>,
        status: &str,
        published_at: Option<&str>,
        tag_ids: &[&str],
    ) -> Post {
        self.store()
            .insert_post(&NewPost {
                title: "Seeded".to_string(),
                category_id: category_id.map(str::to_string),
                status: status.to_string(),
                published_at: published_at.map(str::to_string),
                tag_ids: tag_ids.iter().map(|id| (*id).to_string()).collect(),
            })
            .await
            .expect("failed to seed post")
    }

    pub async fn published_post(&self) -> Post {
        self.seed_post(None, STATUS_PUBLISHED, Some("2026-03-01T10:00:00.000Z"), &[])
            .await
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        self.send_from(None, HeaderMap::new(), method, uri, token, body)
            .await
    }

    pub async fn send_from(
        &self,
        peer: Option<SocketAddr>,
        headers: HeaderMap,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in &headers {
            builder = builder.header(name, value);
        }
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let mut request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        if let Some(peer) = peer {
            request.extensions_mut().insert(ConnectInfo(peer));
        }

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::DELETE, uri, token, None).await
    }

    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        self.post(
            "/api/auth/login",
            None,
            serde_json::json!({ "username": username, "password": password }),
        )
        .await
    }
}
