use serde::Serialize;

use crate::entities::live_updates;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveUpdate {
    pub id: String,
    pub post_id: String,
    pub title: Option<String>,
    pub content: String,
    pub posted_at: String,
    pub created_by: Option<String>,
    pub pinned: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<live_updates::Model> for LiveUpdate {
    fn from(model: live_updates::Model) -> Self {
        Self {
            id: model.id,
            post_id: model.post_id,
            title: model.title,
            content: model.content,
            posted_at: model.posted_at,
            created_by: model.created_by,
            pinned: model.pinned,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewLiveUpdate {
    pub title: Option<String>,
    pub content: String,
    pub posted_at: Option<String>,
    pub created_by: Option<String>,
}

/// Field edits; `None` leaves a field untouched. Pinning goes through the
/// capped pin operation instead.
#[derive(Debug, Clone, Default)]
pub struct LiveUpdateChanges {
    pub title: Option<String>,
    pub content: Option<String>,
}
