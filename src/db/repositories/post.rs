use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::domain::{normalize_timestamp, now_timestamp};
use crate::entities::{post_tags, posts, prelude::*};
use crate::models::post::{NewPost, Post};

/// Posts belong to the authoring service; this side only reads them, apart
/// from seeding through [`PostRepository::insert`].
pub struct PostRepository {
    conn: DatabaseConnection,
}

impl PostRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// `published_at` is stored in UTC with a `Z` suffix; unparseable values
    /// are refused.
    pub async fn insert(&self, post: &NewPost) -> Result<Post> {
        let published_at = post
            .published_at
            .as_deref()
            .map(|value| {
                normalize_timestamp(value)
                    .with_context(|| format!("Invalid publish time: {value}"))
            })
            .transpose()?;

        let txn = self.conn.begin().await?;

        let model = posts::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            title: Set(post.title.clone()),
            category_id: Set(post.category_id.clone()),
            status: Set(post.status.clone()),
            published_at: Set(published_at),
            created_at: Set(now_timestamp()),
        }
        .insert(&txn)
        .await
        .context("Failed to insert post")?;

        if !post.tag_ids.is_empty() {
            let links = post.tag_ids.iter().map(|tag_id| post_tags::ActiveModel {
                post_id: Set(model.id.clone()),
                tag_id: Set(tag_id.clone()),
            });

            PostTags::insert_many(links)
                .exec(&txn)
                .await
                .context("Failed to link post tags")?;
        }

        txn.commit().await?;
        Ok(Post::from(model))
    }

    pub async fn exists(&self, id: &str) -> Result<bool> {
        let count = Posts::find_by_id(id.to_string())
            .count(&self.conn)
            .await
            .context("Failed to check post existence")?;

        Ok(count > 0)
    }

    /// Tag ids linked to a post, including tags that no longer exist.
    pub async fn tag_ids(&self, post_id: &str) -> Result<Vec<String>> {
        let ids: Vec<String> = PostTags::find()
            .select_only()
            .column(post_tags::Column::TagId)
            .filter(post_tags::Column::PostId.eq(post_id))
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to query post tags")?;

        Ok(ids)
    }
}
