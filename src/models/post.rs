use serde::Serialize;

use crate::entities::posts;

/// Read-only view of a post written by the authoring service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub category_id: Option<String>,
    pub status: String,
    pub published_at: Option<String>,
    pub created_at: String,
}

impl From<posts::Model> for Post {
    fn from(model: posts::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            category_id: model.category_id,
            status: model.status,
            published_at: model.published_at,
            created_at: model.created_at,
        }
    }
}

/// Seed data for a post, used by fixtures and local tooling.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub category_id: Option<String>,
    pub status: String,
    pub published_at: Option<String>,
    pub tag_ids: Vec<String>,
}
