use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, Statement,
};
use uuid::Uuid;

use crate::domain::{normalize_timestamp, now_timestamp};
use crate::entities::{live_updates, prelude::*};
use crate::models::live_update::{LiveUpdate, LiveUpdateChanges, NewLiveUpdate};

/// Result of a capped pin or an unpin.
#[derive(Debug)]
pub enum PinOutcome {
    Updated(LiveUpdate),
    LimitReached,
    NotFound,
}

/// Pins only when the row is already pinned or its post has fewer than the
/// cap pinned. `SQLite` runs the whole statement under one write lock.
const PIN_WITHIN_CAP: &str = "UPDATE live_updates SET pinned = 1, updated_at = ? \
     WHERE id = ? AND (pinned = 1 OR ( \
         SELECT COUNT(*) FROM live_updates AS siblings \
         WHERE siblings.post_id = live_updates.post_id AND siblings.pinned = 1 \
     ) < ?)";

pub struct LiveUpdateRepository {
    conn: DatabaseConnection,
}

impl LiveUpdateRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, post_id: &str, update: &NewLiveUpdate) -> Result<LiveUpdate> {
        let now = now_timestamp();
        let posted_at = match update.posted_at.as_deref() {
            Some(value) => normalize_timestamp(value)
                .with_context(|| format!("Invalid posting time: {value}"))?,
            None => now.clone(),
        };
        let model = live_updates::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            post_id: Set(post_id.to_string()),
            title: Set(update.title.clone()),
            content: Set(update.content.clone()),
            posted_at: Set(posted_at),
            created_by: Set(update.created_by.clone()),
            pinned: Set(false),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert live update")?;

        Ok(LiveUpdate::from(model))
    }

    /// Timeline of a post, oldest first.
    pub async fn list_for_post(&self, post_id: &str) -> Result<Vec<LiveUpdate>> {
        let rows = LiveUpdates::find()
            .filter(live_updates::Column::PostId.eq(post_id))
            .order_by_asc(live_updates::Column::PostedAt)
            .order_by_asc(live_updates::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list live updates")?;

        Ok(rows.into_iter().map(LiveUpdate::from).collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<LiveUpdate>> {
        let model = LiveUpdates::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query live update")?;

        Ok(model.map(LiveUpdate::from))
    }

    pub async fn update(&self, id: &str, changes: &LiveUpdateChanges) -> Result<Option<LiveUpdate>> {
        let mut update = LiveUpdates::update_many()
            .col_expr(live_updates::Column::UpdatedAt, Expr::value(now_timestamp()))
            .filter(live_updates::Column::Id.eq(id));

        if let Some(title) = &changes.title {
            update = update.col_expr(live_updates::Column::Title, Expr::value(title.clone()));
        }

        if let Some(content) = &changes.content {
            update = update.col_expr(live_updates::Column::Content, Expr::value(content.clone()));
        }

        let result = update
            .exec(&self.conn)
            .await
            .context("Failed to update live update")?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get(id).await
    }

    /// Pins within `max_pinned` per post, or unpins unconditionally.
    pub async fn set_pinned(&self, id: &str, pinned: bool, max_pinned: u32) -> Result<PinOutcome> {
        let rows_affected = if pinned {
            let backend = self.conn.get_database_backend();
            let statement = Statement::from_sql_and_values(
                backend,
                PIN_WITHIN_CAP,
                [
                    now_timestamp().into(),
                    id.into(),
                    i64::from(max_pinned).into(),
                ],
            );

            self.conn
                .execute(statement)
                .await
                .context("Failed to pin live update")?
                .rows_affected()
        } else {
            LiveUpdates::update_many()
                .col_expr(live_updates::Column::Pinned, Expr::value(false))
                .col_expr(live_updates::Column::UpdatedAt, Expr::value(now_timestamp()))
                .filter(live_updates::Column::Id.eq(id))
                .exec(&self.conn)
                .await
                .context("Failed to unpin live update")?
                .rows_affected
        };

        let current = self.get(id).await?;
        Ok(match (rows_affected, current) {
            (_, None) => PinOutcome::NotFound,
            (0, Some(_)) => PinOutcome::LimitReached,
            (_, Some(update)) => PinOutcome::Updated(update),
        })
    }

    /// Removes an update and returns what was removed.
    pub async fn delete(&self, id: &str) -> Result<Option<LiveUpdate>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let result = LiveUpdates::delete_by_id(id.to_string())
            .exec(&self.conn)
            .await
            .context("Failed to delete live update")?;

        Ok((result.rows_affected > 0).then_some(existing))
    }
}
