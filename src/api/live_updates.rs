use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::auth::AuthUser;
use super::validation::{truthy, validate_id};
use super::{ApiError, ApiJson, ApiResponse, AppState};
use crate::models::live_update::LiveUpdate;
use crate::services::{CreateLiveUpdate, EditLiveUpdate, LiveUpdateError};

impl From<LiveUpdateError> for ApiError {
    fn from(err: LiveUpdateError) -> Self {
        match err {
            LiveUpdateError::PostNotFound | LiveUpdateError::NotFound => {
                Self::not_found(err.to_string())
            }
            LiveUpdateError::PinLimitExceeded(_) => Self::validation(err.to_string()),
            LiveUpdateError::Validation(msg) => Self::validation(msg),
            LiveUpdateError::Database(msg) => Self::DatabaseError(msg),
            LiveUpdateError::Internal(msg) => Self::internal(msg),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    /// Coerced loosely; see [`truthy`].
    #[serde(default)]
    pub pinned: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct PinRequest {
    #[serde(default)]
    pub pin: Value,
}

/// `POST /api/live-updates/{postId}`
pub async fn create(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    ApiJson(mut payload): ApiJson<CreateLiveUpdate>,
) -> Result<(StatusCode, Json<ApiResponse<LiveUpdate>>), ApiError> {
    let post_id = validate_id(&post_id).ok_or(LiveUpdateError::PostNotFound)?;
    if payload.created_by.is_none() {
        payload.created_by = Some(claims.username);
    }

    let update = state
        .live_update_service()
        .create(post_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(update))))
}

/// `GET /api/live-updates/{postId}`
pub async fn list_for_post(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<LiveUpdate>>>, ApiError> {
    let post_id = validate_id(&post_id).ok_or(LiveUpdateError::PostNotFound)?;
    let updates = state.live_update_service().list_for_post(post_id).await?;
    Ok(Json(ApiResponse::success(updates)))
}

/// `PUT /api/live-updates/{updateId}`
pub async fn edit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<EditRequest>,
) -> Result<Json<ApiResponse<LiveUpdate>>, ApiError> {
    let id = validate_id(&id).ok_or(LiveUpdateError::NotFound)?;
    let edit = EditLiveUpdate {
        title: payload.title,
        content: payload.content,
        pinned: payload.pinned.as_ref().map(truthy),
    };

    let update = state.live_update_service().edit(id, edit).await?;
    Ok(Json(ApiResponse::with_message(
        update,
        "Live update edited successfully.",
    )))
}

/// `PUT /api/live-updates/pin/{updateId}`
pub async fn pin(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<PinRequest>,
) -> Result<Json<ApiResponse<LiveUpdate>>, ApiError> {
    let id = validate_id(&id).ok_or(LiveUpdateError::NotFound)?;
    let pin = truthy(&payload.pin);

    let update = state.live_update_service().set_pinned(id, pin).await?;
    let message = if pin {
        "Update pinned!"
    } else {
        "Update unpinned!"
    };
    Ok(Json(ApiResponse::with_message(update, message)))
}

/// `DELETE /api/live-updates/{updateId}`
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<LiveUpdate>>, ApiError> {
    let id = validate_id(&id).ok_or(LiveUpdateError::NotFound)?;
    let removed = state.live_update_service().delete(id).await?;
    Ok(Json(ApiResponse::with_message(
        removed,
        "Live update deleted successfully.",
    )))
}
