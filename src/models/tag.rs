use serde::Serialize;

use crate::entities::tags;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub is_trending: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<tags::Model> for Tag {
    fn from(model: tags::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            description: model.description,
            is_trending: model.is_trending,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagSummary {
    #[serde(flatten)]
    pub tag: Tag,
    /// Published posts referencing the tag.
    pub post_count: u64,
}

#[derive(Debug, Clone)]
pub struct TagRecord {
    pub name: String,
    pub slug: String,
    pub description: String,
    /// Only applied when the tag is created; use the toggle afterwards.
    pub is_trending: bool,
}
