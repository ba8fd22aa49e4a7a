use std::collections::HashMap;

use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::unique_violation;
use crate::constants::posts::STATUS_PUBLISHED;
use crate::domain::now_timestamp;
use crate::domain::slug::case_key;
use crate::entities::{categories, posts, prelude::*};
use crate::models::category::{Category, CategoryRecord};

/// Outcome of a category write against the uniqueness indexes.
#[derive(Debug)]
pub enum CategoryWrite {
    Saved(Category),
    SlugTaken,
    NameTaken,
}

/// Published-post figures for one category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPostStats {
    pub post_count: u64,
    pub last_published: Option<String>,
}

pub struct CategoryRepository {
    conn: DatabaseConnection,
}

impl CategoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn scope_key(parent_id: Option<&str>, name: &str) -> String {
        format!("{}/{}", parent_id.unwrap_or_default(), case_key(name))
    }

    fn classify(err: DbErr, action: &'static str) -> Result<CategoryWrite> {
        match unique_violation(&err) {
            Some(message) if message.contains("slug_key") => Ok(CategoryWrite::SlugTaken),
            Some(_) => Ok(CategoryWrite::NameTaken),
            None => Err(anyhow::Error::new(err).context(action)),
        }
    }

    pub async fn insert(&self, record: &CategoryRecord) -> Result<CategoryWrite> {
        let now = now_timestamp();
        let active = categories::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(record.name.clone()),
            slug: Set(record.slug.clone()),
            slug_key: Set(case_key(&record.slug)),
            scope_key: Set(Self::scope_key(record.parent_id.as_deref(), &record.name)),
            parent_id: Set(record.parent_id.clone()),
            description: Set(record.description.clone()),
            keywords: Set(record.keywords.clone()),
            last_updated: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(CategoryWrite::Saved(Category::from(model))),
            Err(err) => Self::classify(err, "Failed to insert category"),
        }
    }

    /// Replaces the editable fields. Returns `None` when the id is unknown.
    pub async fn update(&self, id: &str, record: &CategoryRecord) -> Result<Option<CategoryWrite>> {
        let Some(existing) = Categories::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query category")?
        else {
            return Ok(None);
        };

        let mut active: categories::ActiveModel = existing.into();
        active.name = Set(record.name.clone());
        active.slug = Set(record.slug.clone());
        active.slug_key = Set(case_key(&record.slug));
        active.scope_key = Set(Self::scope_key(record.parent_id.as_deref(), &record.name));
        active.parent_id = Set(record.parent_id.clone());
        active.description = Set(record.description.clone());
        active.keywords = Set(record.keywords.clone());
        active.updated_at = Set(now_timestamp());

        match active.update(&self.conn).await {
            Ok(model) => Ok(Some(CategoryWrite::Saved(Category::from(model)))),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(err) => Self::classify(err, "Failed to update category").map(Some),
        }
    }

    pub async fn get(&self, id: &str) -> Result<Option<Category>> {
        let model = Categories::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query category")?;

        Ok(model.map(Category::from))
    }

    pub async fn list(&self) -> Result<Vec<Category>> {
        let rows = Categories::find()
            .order_by_asc(categories::Column::CreatedAt)
            .order_by_asc(categories::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list categories")?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Unconditional delete; posts keep their category reference.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = Categories::delete_by_id(id.to_string())
            .exec(&self.conn)
            .await
            .context("Failed to delete category")?;

        Ok(result.rows_affected > 0)
    }

    /// Post count and newest publish time per category, over published posts
    /// only, in a single grouped query.
    pub async fn published_post_stats(&self) -> Result<HashMap<String, CategoryPostStats>> {
        let rows: Vec<(String, i64, Option<String>)> = Posts::find()
            .select_only()
            .column(posts::Column::CategoryId)
            .column_as(posts::Column::Id.count(), "post_count")
            .column_as(posts::Column::PublishedAt.max(), "last_published")
            .filter(posts::Column::Status.eq(STATUS_PUBLISHED))
            .filter(posts::Column::CategoryId.is_not_null())
            .group_by(posts::Column::CategoryId)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to aggregate category post stats")?;

        Ok(rows
            .into_iter()
            .map(|(category_id, count, last_published)| {
                let stats = CategoryPostStats {
                    post_count: u64::try_from(count).unwrap_or_default(),
                    last_published,
                };
                (category_id, stats)
            })
            .collect())
    }

    /// Publish time of the category's latest post that has one, regardless of status.
    pub async fn latest_published_at(&self, category_id: &str) -> Result<Option<String>> {
        let latest: Option<Option<String>> = Posts::find()
            .select_only()
            .column(posts::Column::PublishedAt)
            .filter(posts::Column::CategoryId.eq(category_id))
            .filter(posts::Column::PublishedAt.is_not_null())
            .order_by_desc(posts::Column::PublishedAt)
            .into_tuple()
            .one(&self.conn)
            .await
            .context("Failed to query latest post for category")?;

        Ok(latest.flatten())
    }

    pub async fn set_last_updated(&self, id: &str, last_updated: Option<String>) -> Result<bool> {
        let result = Categories::update_many()
            .col_expr(categories::Column::LastUpdated, Expr::value(last_updated))
            .col_expr(categories::Column::UpdatedAt, Expr::value(now_timestamp()))
            .filter(categories::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to store category last update")?;

        Ok(result.rows_affected > 0)
    }
}
