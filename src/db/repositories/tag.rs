use std::collections::HashMap;

use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use super::unique_violation;
use crate::constants::posts::STATUS_PUBLISHED;
use crate::domain::now_timestamp;
use crate::domain::slug::case_key;
use crate::entities::{post_tags, posts, prelude::*, tags};
use crate::models::tag::{Tag, TagRecord};

#[derive(Debug)]
pub enum TagWrite {
    Saved(Tag),
    /// Name or slug collides with another tag, ignoring case.
    Conflict,
}

pub struct TagRepository {
    conn: DatabaseConnection,
}

impl TagRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn classify(err: DbErr, action: &'static str) -> Result<TagWrite> {
        if unique_violation(&err).is_some() {
            Ok(TagWrite::Conflict)
        } else {
            Err(anyhow::Error::new(err).context(action))
        }
    }

    pub async fn insert(&self, record: &TagRecord) -> Result<TagWrite> {
        let now = now_timestamp();
        let active = tags::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(record.name.clone()),
            name_key: Set(case_key(&record.name)),
            slug: Set(record.slug.clone()),
            slug_key: Set(case_key(&record.slug)),
            description: Set(record.description.clone()),
            is_trending: Set(record.is_trending),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(TagWrite::Saved(Tag::from(model))),
            Err(err) => Self::classify(err, "Failed to insert tag"),
        }
    }

    pub async fn update(&self, id: &str, record: &TagRecord) -> Result<Option<TagWrite>> {
        let Some(existing) = Tags::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query tag")?
        else {
            return Ok(None);
        };

        let mut active: tags::ActiveModel = existing.into();
        active.name = Set(record.name.clone());
        active.name_key = Set(case_key(&record.name));
        active.slug = Set(record.slug.clone());
        active.slug_key = Set(case_key(&record.slug));
        active.description = Set(record.description.clone());
        active.updated_at = Set(now_timestamp());

        match active.update(&self.conn).await {
            Ok(model) => Ok(Some(TagWrite::Saved(Tag::from(model)))),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(err) => Self::classify(err, "Failed to update tag").map(Some),
        }
    }

    pub async fn get(&self, id: &str) -> Result<Option<Tag>> {
        let model = Tags::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query tag")?;

        Ok(model.map(Tag::from))
    }

    pub async fn list(&self) -> Result<Vec<Tag>> {
        let rows = Tags::find()
            .order_by_asc(tags::Column::CreatedAt)
            .order_by_asc(tags::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list tags")?;

        Ok(rows.into_iter().map(Tag::from).collect())
    }

    pub async fn list_trending(&self) -> Result<Vec<Tag>> {
        let rows = Tags::find()
            .filter(tags::Column::IsTrending.eq(true))
            .order_by_asc(tags::Column::CreatedAt)
            .order_by_asc(tags::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list trending tags")?;

        Ok(rows.into_iter().map(Tag::from).collect())
    }

    /// Flips `is_trending` in place and returns the updated tag.
    pub async fn toggle_trending(&self, id: &str) -> Result<Option<Tag>> {
        let result = Tags::update_many()
            .col_expr(
                tags::Column::IsTrending,
                Expr::col(tags::Column::IsTrending).not(),
            )
            .col_expr(tags::Column::UpdatedAt, Expr::value(now_timestamp()))
            .filter(tags::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to toggle trending flag")?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get(id).await
    }

    /// Unconditional delete; links from posts are left in place.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = Tags::delete_by_id(id.to_string())
            .exec(&self.conn)
            .await
            .context("Failed to delete tag")?;

        Ok(result.rows_affected > 0)
    }

    /// Number of published posts referencing each tag.
    pub async fn published_post_counts(&self) -> Result<HashMap<String, u64>> {
        let rows: Vec<(String, i64)> = PostTags::find()
            .select_only()
            .column(post_tags::Column::TagId)
            .column_as(post_tags::Column::PostId.count(), "post_count")
            .join(JoinType::InnerJoin, post_tags::Relation::Post.def())
            .filter(posts::Column::Status.eq(STATUS_PUBLISHED))
            .group_by(post_tags::Column::TagId)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to count posts per tag")?;

        Ok(rows
            .into_iter()
            .map(|(tag_id, count)| (tag_id, u64::try_from(count).unwrap_or_default()))
            .collect())
    }
}
