use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{EntityTrait, Schema};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        // Parents before children: live_updates and post_tags reference posts.
        create_entity_table(manager, &schema, Users).await?;
        create_entity_table(manager, &schema, Categories).await?;
        create_entity_table(manager, &schema, Tags).await?;
        create_entity_table(manager, &schema, Posts).await?;
        create_entity_table(manager, &schema, PostTags).await?;
        create_entity_table(manager, &schema, LiveUpdates).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Children first so foreign keys never dangle mid-teardown.
        drop_entity_table(manager, LiveUpdates).await?;
        drop_entity_table(manager, PostTags).await?;
        drop_entity_table(manager, Posts).await?;
        drop_entity_table(manager, Tags).await?;
        drop_entity_table(manager, Categories).await?;
        drop_entity_table(manager, Users).await?;

        Ok(())
    }
}

async fn create_entity_table<E: EntityTrait>(
    manager: &SchemaManager<'_>,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr> {
    manager
        .create_table(
            schema
                .create_table_from_entity(entity)
                .if_not_exists()
                .to_owned(),
        )
        .await
}

async fn drop_entity_table<E: EntityTrait>(
    manager: &SchemaManager<'_>,
    entity: E,
) -> Result<(), DbErr> {
    manager
        .drop_table(Table::drop().table(entity).if_exists().to_owned())
        .await
}
