use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub email: String,

    pub username: String,

    /// One of "normal", "admin" or "demo"
    pub permission: String,

    /// Random API key (64-char hex string)
    pub api_key: String,

    pub api_secret: String,

    /// Days of history shown by saved searches. NULL means "no limit".
    pub saved_search_time_period: Option<i32>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::saved_searches::Entity")]
    SavedSearches,
}

impl Related<super::saved_searches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SavedSearches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
