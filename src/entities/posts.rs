use sea_orm::entity::prelude::*;

/// Posts are authored elsewhere; this service only reads them for aggregation
/// and ownership checks.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    /// No foreign key: a deleted category leaves a dangling reference.
    pub category_id: Option<String>,

    pub status: String,

    pub published_at: Option<String>,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::live_updates::Entity")]
    LiveUpdates,

    #[sea_orm(has_many = "super::post_tags::Entity")]
    PostTags,
}

impl Related<super::live_updates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LiveUpdates.def()
    }
}

impl Related<super::post_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostTags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
