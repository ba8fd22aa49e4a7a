//! `SeaORM` implementation of the `TagService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::db::{Store, TagWrite};
use crate::domain::slug::tag_slug;
use crate::models::tag::{Tag, TagRecord, TagSummary};
use crate::services::tag_service::{TagError, TagInput, TagService};

pub struct SeaOrmTagService {
    store: Store,
}

impl SeaOrmTagService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn build_record(input: TagInput) -> Result<TagRecord, TagError> {
        let name = input.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Err(TagError::Validation("Tag name is required.".to_string()));
        }

        let slug = tag_slug(name, input.slug.as_deref());
        if slug.is_empty() {
            return Err(TagError::Validation(
                "Tag slug must contain at least one letter or digit.".to_string(),
            ));
        }

        Ok(TagRecord {
            name: name.to_string(),
            slug,
            description: input.description.unwrap_or_default(),
            is_trending: input.is_trending.unwrap_or(false),
        })
    }
}

#[async_trait]
impl TagService for SeaOrmTagService {
    async fn create(&self, input: TagInput) -> Result<Tag, TagError> {
        let record = Self::build_record(input)?;

        match self.store.insert_tag(&record).await? {
            TagWrite::Saved(tag) => {
                info!(tag_id = %tag.id, slug = %tag.slug, "Tag created");
                Ok(tag)
            }
            TagWrite::Conflict => Err(TagError::Conflict(
                "Tag name or slug already exists.".to_string(),
            )),
        }
    }

    async fn list(&self) -> Result<Vec<TagSummary>, TagError> {
        let (tags, counts) =
            tokio::try_join!(self.store.list_tags(), self.store.tag_post_counts())?;

        Ok(tags
            .into_iter()
            .map(|tag| {
                let post_count = counts.get(&tag.id).copied().unwrap_or_default();
                TagSummary { tag, post_count }
            })
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Tag, TagError> {
        self.store.get_tag(id).await?.ok_or(TagError::NotFound)
    }

    async fn update(&self, id: &str, input: TagInput) -> Result<Tag, TagError> {
        let record = Self::build_record(input)?;

        match self.store.update_tag(id, &record).await? {
            None => Err(TagError::NotFound),
            Some(TagWrite::Saved(tag)) => {
                info!(tag_id = %tag.id, "Tag updated");
                Ok(tag)
            }
            Some(TagWrite::Conflict) => Err(TagError::Conflict(
                "Another tag with the same name or slug already exists.".to_string(),
            )),
        }
    }

    async fn trending(&self) -> Result<Vec<Tag>, TagError> {
        Ok(self.store.list_trending_tags().await?)
    }

    async fn toggle_trending(&self, id: &str) -> Result<Tag, TagError> {
        let tag = self
            .store
            .toggle_tag_trending(id)
            .await?
            .ok_or(TagError::NotFound)?;

        info!(tag_id = %tag.id, trending = tag.is_trending, "Tag trending flag toggled");
        Ok(tag)
    }

    async fn delete(&self, id: &str) -> Result<(), TagError> {
        if !self.store.delete_tag(id).await? {
            return Err(TagError::NotFound);
        }

        info!(tag_id = %id, "Tag deleted");
        Ok(())
    }
}
