//! Domain service for categories.
//!
//! Categories form a shallow tree through an optional parent. Slugs are
//! unique across all categories and names are unique among siblings, both
//! ignoring case.

use serde::Deserialize;
use thiserror::Error;

use crate::models::category::{Category, CategorySummary};

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("Category not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    /// Slug or sibling name already taken.
    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for CategoryError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CategoryError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Create/update payload. `parent_category` of `"none"` means no parent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub parent_category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
}

#[async_trait::async_trait]
pub trait CategoryService: Send + Sync {
    async fn create(&self, input: CategoryInput) -> Result<Category, CategoryError>;

    /// Every category with its published post count and latest publish time.
    async fn list(&self) -> Result<Vec<CategorySummary>, CategoryError>;

    async fn get(&self, id: &str) -> Result<Category, CategoryError>;

    /// Re-validates exactly like `create`. Omitted description and keywords
    /// keep their stored values.
    async fn update(&self, id: &str, input: CategoryInput) -> Result<Category, CategoryError>;

    async fn delete(&self, id: &str) -> Result<(), CategoryError>;

    /// Recomputes the stored `last_updated` from the category's newest post
    /// with a publish time and returns it.
    async fn refresh_last_updated(&self, id: &str) -> Result<Option<String>, CategoryError>;
}
