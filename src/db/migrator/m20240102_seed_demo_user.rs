use crate::entities::prelude::*;
use crate::entities::users;
use crate::services::keys::generate_api_key;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

pub const DEMO_EMAIL: &str = "demo@example.com";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = chrono::Utc::now().to_rfc3339();

        let insert = Query::insert()
            .into_table(Users)
            .columns([
                users::Column::Email,
                users::Column::Username,
                users::Column::Permission,
                users::Column::ApiKey,
                users::Column::ApiSecret,
                users::Column::CreatedAt,
                users::Column::UpdatedAt,
            ])
            .values_panic([
                DEMO_EMAIL.into(),
                "demo".into(),
                "demo".into(),
                generate_api_key().into(),
                generate_api_key().into(),
                now.clone().into(),
                now.into(),
            ])
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(Users)
            .and_where(Expr::col(users::Column::Email).eq(DEMO_EMAIL))
            .to_owned();

        manager.exec_stmt(delete).await?;

        Ok(())
    }
}
