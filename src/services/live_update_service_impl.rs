//! `SeaORM` implementation of the `LiveUpdateService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::db::{PinOutcome, Store};
use crate::models::live_update::{LiveUpdate, LiveUpdateChanges, NewLiveUpdate};
use crate::services::live_update_service::{
    CreateLiveUpdate, EditLiveUpdate, LiveUpdateError, LiveUpdateService,
};

const CONTENT_REQUIRED: &str = "Update content is required.";

pub struct SeaOrmLiveUpdateService {
    store: Store,
    max_pinned: u32,
}

impl SeaOrmLiveUpdateService {
    #[must_use]
    pub const fn new(store: Store, max_pinned: u32) -> Self {
        Self { store, max_pinned }
    }

    async fn require_post(&self, post_id: &str) -> Result<(), LiveUpdateError> {
        if self.store.post_exists(post_id).await? {
            Ok(())
        } else {
            Err(LiveUpdateError::PostNotFound)
        }
    }
}

#[async_trait]
impl LiveUpdateService for SeaOrmLiveUpdateService {
    async fn create(
        &self,
        post_id: &str,
        input: CreateLiveUpdate,
    ) -> Result<LiveUpdate, LiveUpdateError> {
        self.require_post(post_id).await?;

        let content = input.content.unwrap_or_default();
        if content.trim().is_empty() {
            return Err(LiveUpdateError::Validation(CONTENT_REQUIRED.to_string()));
        }

        let update = self
            .store
            .insert_live_update(
                post_id,
                &NewLiveUpdate {
                    title: input.title,
                    content,
                    posted_at: None,
                    created_by: input.created_by,
                },
            )
            .await?;

        info!(post_id = %post_id, update_id = %update.id, "Live update posted");
        Ok(update)
    }

    async fn list_for_post(&self, post_id: &str) -> Result<Vec<LiveUpdate>, LiveUpdateError> {
        self.require_post(post_id).await?;
        Ok(self.store.list_live_updates(post_id).await?)
    }

    async fn edit(&self, id: &str, edit: EditLiveUpdate) -> Result<LiveUpdate, LiveUpdateError> {
        if edit
            .content
            .as_deref()
            .is_some_and(|content| content.trim().is_empty())
        {
            return Err(LiveUpdateError::Validation(CONTENT_REQUIRED.to_string()));
        }

        let mut current = self
            .store
            .get_live_update(id)
            .await?
            .ok_or(LiveUpdateError::NotFound)?;

        // The pin goes first so a refused pin leaves the update untouched.
        if let Some(pinned) = edit.pinned {
            current = self.set_pinned(id, pinned).await?;
        }

        if edit.title.is_some() || edit.content.is_some() {
            let changes = LiveUpdateChanges {
                title: edit.title,
                content: edit.content,
            };
            current = self
                .store
                .update_live_update(id, &changes)
                .await?
                .ok_or(LiveUpdateError::NotFound)?;
        }

        Ok(current)
    }

    async fn set_pinned(&self, id: &str, pinned: bool) -> Result<LiveUpdate, LiveUpdateError> {
        match self
            .store
            .set_live_update_pinned(id, pinned, self.max_pinned)
            .await?
        {
            PinOutcome::Updated(update) => {
                info!(update_id = %id, pinned, "Live update pin changed");
                Ok(update)
            }
            PinOutcome::LimitReached => Err(LiveUpdateError::PinLimitExceeded(self.max_pinned)),
            PinOutcome::NotFound => Err(LiveUpdateError::NotFound),
        }
    }

    async fn delete(&self, id: &str) -> Result<LiveUpdate, LiveUpdateError> {
        let removed = self
            .store
            .delete_live_update(id)
            .await?
            .ok_or(LiveUpdateError::NotFound)?;

        info!(update_id = %id, "Live update deleted");
        Ok(removed)
    }
}
