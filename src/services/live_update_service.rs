//! Domain service for the live-update timeline attached to a post.

use serde::Deserialize;
use thiserror::Error;

use crate::models::live_update::LiveUpdate;

#[derive(Debug, Error)]
pub enum LiveUpdateError {
    #[error("Post not found.")]
    PostNotFound,

    #[error("Live update not found.")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("Cannot pin more than {0} updates.")]
    PinLimitExceeded(u32),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for LiveUpdateError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for LiveUpdateError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLiveUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
}

/// Partial edit; absent fields stay as they are.
#[derive(Debug, Clone, Default)]
pub struct EditLiveUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub pinned: Option<bool>,
}

#[async_trait::async_trait]
pub trait LiveUpdateService: Send + Sync {
    async fn create(
        &self,
        post_id: &str,
        input: CreateLiveUpdate,
    ) -> Result<LiveUpdate, LiveUpdateError>;

    /// Updates of a post ordered by posting time, oldest first.
    async fn list_for_post(&self, post_id: &str) -> Result<Vec<LiveUpdate>, LiveUpdateError>;

    async fn edit(&self, id: &str, edit: EditLiveUpdate) -> Result<LiveUpdate, LiveUpdateError>;

    /// Pins or unpins. Pinning fails with [`LiveUpdateError::PinLimitExceeded`]
    /// when the post already holds the maximum number of pinned updates.
    async fn set_pinned(&self, id: &str, pinned: bool) -> Result<LiveUpdate, LiveUpdateError>;

    /// Removes an update and returns it.
    async fn delete(&self, id: &str) -> Result<LiveUpdate, LiveUpdateError>;
}
