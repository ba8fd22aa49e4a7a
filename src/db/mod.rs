use anyhow::Result;
use chrono::{DateTime, Utc};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::domain::lockout::LockoutPolicy;
use crate::models::category::{Category, CategoryRecord};
use crate::models::live_update::{LiveUpdate, LiveUpdateChanges, NewLiveUpdate};
use crate::models::post::{NewPost, Post};
use crate::models::tag::{Tag, TagRecord};
use crate::models::user::{NewUser, User};

pub mod migrator;
pub mod repositories;

pub use repositories::category::{CategoryPostStats, CategoryWrite};
pub use repositories::live_update::PinOutcome;
pub use repositories::tag::TagWrite;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url
                .trim_start_matches("sqlite://")
                .trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn category_repo(&self) -> repositories::category::CategoryRepository {
        repositories::category::CategoryRepository::new(self.conn.clone())
    }

    fn tag_repo(&self) -> repositories::tag::TagRepository {
        repositories::tag::TagRepository::new(self.conn.clone())
    }

    fn post_repo(&self) -> repositories::post::PostRepository {
        repositories::post::PostRepository::new(self.conn.clone())
    }

    fn live_update_repo(&self) -> repositories::live_update::LiveUpdateRepository {
        repositories::live_update::LiveUpdateRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn create_user(&self, user: &NewUser, config: &SecurityConfig) -> Result<User> {
        self.user_repo().create(user, config).await
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_username_with_password(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>> {
        self.user_repo()
            .get_by_username_with_password(username)
            .await
    }

    pub async fn record_failed_login(
        &self,
        user_id: &str,
        policy: &LockoutPolicy,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        self.user_repo()
            .record_failed_login(user_id, policy, now)
            .await
    }

    pub async fn reset_login_failures(&self, user_id: &str) -> Result<()> {
        self.user_repo().reset_login_failures(user_id).await
    }

    pub async fn unlock_user(&self, username: &str) -> Result<bool> {
        self.user_repo().unlock(username).await
    }

    // ========== Categories ==========

    pub async fn insert_category(&self, record: &CategoryRecord) -> Result<CategoryWrite> {
        self.category_repo().insert(record).await
    }

    pub async fn update_category(
        &self,
        id: &str,
        record: &CategoryRecord,
    ) -> Result<Option<CategoryWrite>> {
        self.category_repo().update(id, record).await
    }

    pub async fn get_category(&self, id: &str) -> Result<Option<Category>> {
        self.category_repo().get(id).await
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.category_repo().list().await
    }

    pub async fn delete_category(&self, id: &str) -> Result<bool> {
        self.category_repo().delete(id).await
    }

    pub async fn category_post_stats(&self) -> Result<HashMap<String, CategoryPostStats>> {
        self.category_repo().published_post_stats().await
    }

    pub async fn latest_category_publish(&self, category_id: &str) -> Result<Option<String>> {
        self.category_repo().latest_published_at(category_id).await
    }

    pub async fn set_category_last_updated(
        &self,
        id: &str,
        last_updated: Option<String>,
    ) -> Result<bool> {
        self.category_repo().set_last_updated(id, last_updated).await
    }

    // ========== Tags ==========

    pub async fn insert_tag(&self, record: &TagRecord) -> Result<TagWrite> {
        self.tag_repo().insert(record).await
    }

    pub async fn update_tag(&self, id: &str, record: &TagRecord) -> Result<Option<TagWrite>> {
        self.tag_repo().update(id, record).await
    }

    pub async fn get_tag(&self, id: &str) -> Result<Option<Tag>> {
        self.tag_repo().get(id).await
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        self.tag_repo().list().await
    }

    pub async fn list_trending_tags(&self) -> Result<Vec<Tag>> {
        self.tag_repo().list_trending().await
    }

    pub async fn toggle_tag_trending(&self, id: &str) -> Result<Option<Tag>> {
        self.tag_repo().toggle_trending(id).await
    }

    pub async fn delete_tag(&self, id: &str) -> Result<bool> {
        self.tag_repo().delete(id).await
    }

    pub async fn tag_post_counts(&self) -> Result<HashMap<String, u64>> {
        self.tag_repo().published_post_counts().await
    }

    // ========== Posts ==========

    pub async fn insert_post(&self, post: &NewPost) -> Result<Post> {
        self.post_repo().insert(post).await
    }

    pub async fn post_exists(&self, id: &str) -> Result<bool> {
        self.post_repo().exists(id).await
    }

    pub async fn get_post_tag_ids(&self, post_id: &str) -> Result<Vec<String>> {
        self.post_repo().tag_ids(post_id).await
    }

    // ========== Live updates ==========

    pub async fn insert_live_update(
        &self,
        post_id: &str,
        update: &NewLiveUpdate,
    ) -> Result<LiveUpdate> {
        self.live_update_repo().insert(post_id, update).await
    }

    pub async fn list_live_updates(&self, post_id: &str) -> Result<Vec<LiveUpdate>> {
        self.live_update_repo().list_for_post(post_id).await
    }

    pub async fn get_live_update(&self, id: &str) -> Result<Option<LiveUpdate>> {
        self.live_update_repo().get(id).await
    }

    pub async fn update_live_update(
        &self,
        id: &str,
        changes: &LiveUpdateChanges,
    ) -> Result<Option<LiveUpdate>> {
        self.live_update_repo().update(id, changes).await
    }

    pub async fn set_live_update_pinned(
        &self,
        id: &str,
        pinned: bool,
        max_pinned: u32,
    ) -> Result<PinOutcome> {
        self.live_update_repo()
            .set_pinned(id, pinned, max_pinned)
            .await
    }

    pub async fn delete_live_update(&self, id: &str) -> Result<Option<LiveUpdate>> {
        self.live_update_repo().delete(id).await
    }
}
