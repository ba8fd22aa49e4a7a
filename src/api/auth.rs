use axum::{
    Extension, Json,
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, ApiJson, ApiResponse, AppState};
use crate::models::user::User;
use crate::services::{AuthError, Claims};

const NO_TOKEN: &str = "No token provided. Authorization denied.";
const BAD_TOKEN: &str = "Invalid or expired token. Please log in again.";
const ADMINS_ONLY: &str = "Access denied. Admins only.";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: String,
}

/// Claims of the caller, attached by both guards.
#[derive(Clone, Debug)]
pub struct AuthUser(pub Claims);

/// Account of an admin caller, attached by [`require_admin`].
#[derive(Clone, Debug)]
pub struct AdminUser(pub User);

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::unauthorized(err.to_string()),
            AuthError::AccountLocked => Self::forbidden(err.to_string()),
            AuthError::Unauthenticated => Self::unauthorized(BAD_TOKEN),
            AuthError::Forbidden => Self::forbidden(ADMINS_ONLY),
            AuthError::UserNotFound => Self::not_found("User not found"),
            AuthError::Validation(msg) => Self::validation(msg),
            AuthError::Database(msg) => Self::DatabaseError(msg),
            AuthError::Internal(msg) => Self::internal(msg),
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Claims, ApiError> {
    let token = bearer_token(headers).ok_or_else(|| ApiError::unauthorized(NO_TOKEN))?;
    let claims = state.tokens().verify(token)?;

    tracing::Span::current().record("user_id", claims.id.as_str());
    Ok(claims)
}

/// Rejects requests without a valid bearer token.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = authenticate(&state, request.headers())?;
    request.extensions_mut().insert(AuthUser(claims));
    Ok(next.run(request).await)
}

/// Like [`require_auth`], and the account behind the token must still exist
/// with the admin role.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = authenticate(&state, request.headers())?;

    let user = match state.auth_service().current_user(&claims.id).await {
        Ok(user) => user,
        Err(AuthError::UserNotFound) => return Err(AuthError::Forbidden.into()),
        Err(err) => return Err(err.into()),
    };

    if !user.is_admin() {
        tracing::warn!(user_id = %user.id, "Non-admin attempted an admin action");
        return Err(AuthError::Forbidden.into());
    }

    request.extensions_mut().insert(AuthUser(claims));
    request.extensions_mut().insert(AdminUser(user));
    Ok(next.run(request).await)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation("Username and password are required"));
    }

    let result = state
        .auth_service()
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(LoginResponse {
        token: result.token,
        role: result.role,
    }))
}

/// GET /auth/protected
pub async fn protected(Extension(AuthUser(claims)): Extension<AuthUser>) -> Json<ApiResponse<()>> {
    Json(ApiResponse::message(format!(
        "Hello, {}. You are authenticated!",
        claims.username
    )))
}

/// GET /auth/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state.auth_service().current_user(&claims.id).await?;
    Ok(Json(ApiResponse::success(user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(bearer_token(&headers), None);
    }
}
