use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::validate_id;
use super::{ApiError, ApiJson, ApiResponse, AppState};
use crate::models::category::{Category, CategorySummary};
use crate::services::{CategoryError, CategoryInput};

impl From<CategoryError> for ApiError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::NotFound => Self::not_found(err.to_string()),
            CategoryError::Validation(msg) | CategoryError::Conflict(msg) => Self::validation(msg),
            CategoryError::Database(msg) => Self::DatabaseError(msg),
            CategoryError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// `POST /api/categories/add-category`
pub async fn add_category(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<CategoryInput>,
) -> Result<(StatusCode, Json<ApiResponse<Category>>), ApiError> {
    let category = state.category_service().create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            category,
            "Category created successfully",
        )),
    ))
}

/// `GET /api/categories/list-categories`
///
/// Each entry carries `postCount` and `lastUpdated` derived from published posts.
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<CategorySummary>>>, ApiError> {
    let categories = state.category_service().list().await?;
    Ok(Json(ApiResponse::success(categories)))
}

pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Category>>, ApiError> {
    let id = validate_id(&id).ok_or(CategoryError::NotFound)?;
    let category = state.category_service().get(id).await?;
    Ok(Json(ApiResponse::success(category)))
}

pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<CategoryInput>,
) -> Result<Json<ApiResponse<Category>>, ApiError> {
    let id = validate_id(&id).ok_or(CategoryError::NotFound)?;
    let category = state.category_service().update(id, payload).await?;
    Ok(Json(ApiResponse::with_message(
        category,
        "Category updated successfully",
    )))
}

pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_id(&id).ok_or(CategoryError::NotFound)?;
    state.category_service().delete(id).await?;
    Ok(Json(ApiResponse::message("Category deleted successfully")))
}
