use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::services::{
    AuthService, CategoryService, LiveUpdateService, LoginRateLimiter, TagService, TokenService,
};
use crate::state::SharedState;

pub mod auth;
mod categories;
mod error;
mod live_updates;
mod observability;
pub mod rate_limit;
mod tags;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use tokio::sync::RwLock;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.shared.tokens
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn category_service(&self) -> &Arc<dyn CategoryService> {
        &self.shared.category_service
    }

    #[must_use]
    pub fn tag_service(&self) -> &Arc<dyn TagService> {
        &self.shared.tag_service
    }

    #[must_use]
    pub fn live_update_service(&self) -> &Arc<dyn LiveUpdateService> {
        &self.shared.live_update_service
    }

    #[must_use]
    pub fn login_limiter(&self) -> &LoginRateLimiter {
        &self.shared.login_limiter
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().read().await.server.cors_allowed_origins.clone();

    let api_router = Router::new()
        .merge(auth_routes(&state))
        .merge(category_routes(&state))
        .merge(tag_routes(&state))
        .merge(live_update_routes(&state))
        .route(
            "/metrics",
            get(observability::get_metrics).route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth::require_admin,
            )),
        )
        .with_state(state);

    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_credentials(true)
    };

    Router::new()
        .route("/", get(|| async { "Newsdesk API is running" }))
        .nest("/api", api_router)
        .layer(
            cors_layer
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        // The request span has to be current inside guards, so TraceLayer wraps it.
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(TraceLayer::new_for_http())
}

fn auth_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let signed_in = middleware::from_fn_with_state(state.clone(), auth::require_auth);
    let limited = middleware::from_fn_with_state(state.clone(), rate_limit::login_rate_limit);

    Router::new()
        .route("/auth/login", post(auth::login).route_layer(limited))
        .route(
            "/auth/protected",
            get(auth::protected).route_layer(signed_in.clone()),
        )
        .route("/auth/me", get(auth::me).route_layer(signed_in))
}

fn category_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let signed_in = middleware::from_fn_with_state(state.clone(), auth::require_auth);
    let admin = middleware::from_fn_with_state(state.clone(), auth::require_admin);

    Router::new()
        .route(
            "/categories/add-category",
            post(categories::add_category).route_layer(signed_in.clone()),
        )
        .route(
            "/categories/list-categories",
            get(categories::list_categories),
        )
        .route("/categories/{id}", get(categories::get_category))
        .route(
            "/categories/update-category/{id}",
            put(categories::update_category).route_layer(signed_in),
        )
        .route(
            "/categories/delete-category/{id}",
            delete(categories::delete_category).route_layer(admin),
        )
}

fn tag_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let signed_in = middleware::from_fn_with_state(state.clone(), auth::require_auth);
    let admin = middleware::from_fn_with_state(state.clone(), auth::require_admin);

    Router::new()
        .route(
            "/tags/add-tag",
            post(tags::add_tag).route_layer(signed_in.clone()),
        )
        .route("/tags/list-tags", get(tags::list_tags))
        .route("/tags/trending-tags", get(tags::trending_tags))
        .route("/tags/{id}", get(tags::get_tag))
        .route(
            "/tags/update-tag/{id}",
            put(tags::update_tag).route_layer(signed_in.clone()),
        )
        .route(
            "/tags/mark-as-trending/{id}",
            put(tags::mark_as_trending).route_layer(signed_in),
        )
        .route(
            "/tags/delete-tag/{id}",
            delete(tags::delete_tag).route_layer(admin),
        )
}

/// `/{id}` is a post id for POST and GET and an update id for PUT and
/// DELETE, so guards are attached per method.
fn live_update_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let signed_in = middleware::from_fn_with_state(state.clone(), auth::require_auth);
    let admin = middleware::from_fn_with_state(state.clone(), auth::require_admin);

    Router::new()
        .route(
            "/live-updates/{id}",
            get(live_updates::list_for_post)
                .merge(
                    post(live_updates::create)
                        .put(live_updates::edit)
                        .route_layer(signed_in.clone()),
                )
                .merge(delete(live_updates::delete).route_layer(admin)),
        )
        .route(
            "/live-updates/pin/{id}",
            put(live_updates::pin).route_layer(signed_in),
        )
}
