//! Domain service for tags.

use serde::Deserialize;
use thiserror::Error;

use crate::models::tag::{Tag, TagSummary};

#[derive(Debug, Error)]
pub enum TagError {
    #[error("Tag not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    /// Name or slug collides with another tag, ignoring case.
    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for TagError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for TagError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Honoured on create only.
    #[serde(default)]
    pub is_trending: Option<bool>,
}

#[async_trait::async_trait]
pub trait TagService: Send + Sync {
    async fn create(&self, input: TagInput) -> Result<Tag, TagError>;

    /// Every tag with the number of published posts referencing it.
    async fn list(&self) -> Result<Vec<TagSummary>, TagError>;

    async fn get(&self, id: &str) -> Result<Tag, TagError>;

    /// Replaces name, slug and description. An omitted description is cleared.
    async fn update(&self, id: &str, input: TagInput) -> Result<Tag, TagError>;

    async fn trending(&self) -> Result<Vec<Tag>, TagError>;

    /// Flips the trending flag and returns the tag.
    async fn toggle_trending(&self, id: &str) -> Result<Tag, TagError>;

    /// Unconditional; posts keep their links to the removed tag.
    async fn delete(&self, id: &str) -> Result<(), TagError>;
}
