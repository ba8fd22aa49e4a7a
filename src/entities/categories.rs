use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    pub slug: String,

    /// Lowercased slug, unique across all categories.
    #[sea_orm(unique)]
    pub slug_key: String,

    /// `<parent id>/<lowercased name>`, unique so names never repeat under one parent.
    #[sea_orm(unique)]
    pub scope_key: String,

    /// Self reference without a foreign key: deleting a parent leaves children as they are.
    pub parent_id: Option<String>,

    pub description: String,

    pub keywords: String,

    pub last_updated: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
