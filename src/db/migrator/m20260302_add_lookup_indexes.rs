use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const INDEXES: &[(&str, &str)] = &[
    (
        "idx_posts_category_status",
        "CREATE INDEX IF NOT EXISTS idx_posts_category_status ON posts(category_id, status)",
    ),
    (
        "idx_post_tags_tag",
        "CREATE INDEX IF NOT EXISTS idx_post_tags_tag ON post_tags(tag_id)",
    ),
    (
        "idx_live_updates_post_pinned",
        "CREATE INDEX IF NOT EXISTS idx_live_updates_post_pinned ON live_updates(post_id, pinned)",
    ),
    (
        "idx_live_updates_post_posted_at",
        "CREATE INDEX IF NOT EXISTS idx_live_updates_post_posted_at ON live_updates(post_id, posted_at)",
    ),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        for (_, sql) in INDEXES {
            conn.execute_unprepared(sql).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        for (name, _) in INDEXES {
            conn.execute_unprepared(&format!("DROP INDEX IF EXISTS {name}"))
                .await?;
        }

        Ok(())
    }
}
