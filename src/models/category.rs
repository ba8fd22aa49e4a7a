use serde::Serialize;

use crate::constants::categories::NEVER_UPDATED;
use crate::entities::categories;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub parent_category: Option<String>,
    pub description: String,
    pub keywords: String,
    pub last_updated: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<categories::Model> for Category {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            parent_category: model.parent_id,
            description: model.description,
            keywords: model.keywords,
            last_updated: model.last_updated,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// A category as listed, with figures derived from its published posts.
///
/// `last_updated` is the newest publish time among those posts, or `"N/A"`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub parent_category: Option<String>,
    pub description: String,
    pub keywords: String,
    pub post_count: u64,
    pub last_updated: String,
    pub created_at: String,
    pub updated_at: String,
}

impl CategorySummary {
    #[must_use]
    pub fn new(category: Category, post_count: u64, last_published: Option<String>) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
            parent_category: category.parent_category,
            description: category.description,
            keywords: category.keywords,
            post_count,
            last_updated: last_published.unwrap_or_else(|| NEVER_UPDATED.to_string()),
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

/// Fully validated values ready to be written.
#[derive(Debug, Clone)]
pub struct CategoryRecord {
    pub name: String,
    pub slug: String,
    pub parent_id: Option<String>,
    pub description: String,
    pub keywords: String,
}
