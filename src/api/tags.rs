use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::validate_id;
use super::{ApiError, ApiJson, ApiResponse, AppState};
use crate::models::tag::{Tag, TagSummary};
use crate::services::{TagError, TagInput};

impl From<TagError> for ApiError {
    fn from(err: TagError) -> Self {
        match err {
            TagError::NotFound => Self::not_found(err.to_string()),
            TagError::Validation(msg) | TagError::Conflict(msg) => Self::validation(msg),
            TagError::Database(msg) => Self::DatabaseError(msg),
            TagError::Internal(msg) => Self::internal(msg),
        }
    }
}

pub async fn add_tag(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<TagInput>,
) -> Result<(StatusCode, Json<ApiResponse<Tag>>), ApiError> {
    let tag = state.tag_service().create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(tag, "Tag created successfully")),
    ))
}

pub async fn list_tags(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<TagSummary>>>, ApiError> {
    let tags = state.tag_service().list().await?;
    Ok(Json(ApiResponse::success(tags)))
}

pub async fn trending_tags(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Tag>>>, ApiError> {
    let tags = state.tag_service().trending().await?;
    Ok(Json(ApiResponse::success(tags)))
}

pub async fn get_tag(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Tag>>, ApiError> {
    let id = validate_id(&id).ok_or(TagError::NotFound)?;
    let tag = state.tag_service().get(id).await?;
    Ok(Json(ApiResponse::success(tag)))
}

pub async fn update_tag(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<TagInput>,
) -> Result<Json<ApiResponse<Tag>>, ApiError> {
    let id = validate_id(&id).ok_or(TagError::NotFound)?;
    let tag = state.tag_service().update(id, payload).await?;
    Ok(Json(ApiResponse::with_message(tag, "Tag updated successfully")))
}

/// `PUT /api/tags/mark-as-trending/{id}` flips the flag either way.
pub async fn mark_as_trending(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Tag>>, ApiError> {
    let id = validate_id(&id).ok_or(TagError::NotFound)?;
    let tag = state.tag_service().toggle_trending(id).await?;
    let message = if tag.is_trending {
        "Tag marked as trending"
    } else {
        "Tag marked as not trending"
    };
    Ok(Json(ApiResponse::with_message(tag, message)))
}

pub async fn delete_tag(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_id(&id).ok_or(TagError::NotFound)?;
    state.tag_service().delete(id).await?;
    Ok(Json(ApiResponse::message("Tag deleted successfully")))
}
