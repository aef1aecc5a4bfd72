use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use crate::entities::users;
use crate::models::{Account, NewAccount, Permission};
use crate::services::keys::KeyGenerator;

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Insert a new account. The API key and secret are generated here, before
    /// the row is written, so no account ever exists without credentials.
    pub async fn create(&self, account: &NewAccount, keys: &dyn KeyGenerator) -> Result<Account> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = users::ActiveModel {
            email: Set(account.email.clone()),
            username: Set(account.username.clone()),
            permission: Set(account.permission.as_str().to_string()),
            api_key: Set(keys.generate_user_key()),
            api_secret: Set(keys.generate_user_key()),
            saved_search_time_period: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .with_context(|| format!("Failed to insert user {}", account.email))?;

        info!(user_id = model.id, permission = %model.permission, "Created user account");
        Ok(Account::from(model))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<Account>> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(Account::from))
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<Account>> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user.map(Account::from))
    }

    /// The shared account anonymous visitors are logged in as.
    pub async fn get_demo(&self) -> Result<Option<Account>> {
        let user = users::Entity::find()
            .filter(users::Column::Permission.eq(Permission::Demo.as_str()))
            .order_by_asc(users::Column::Id)
            .one(&self.conn)
            .await
            .context("Failed to query demo user")?;

        Ok(user.map(Account::from))
    }

    /// Verify API key and return the associated account
    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<Account>> {
        let user = users::Entity::find()
            .filter(users::Column::ApiKey.eq(api_key))
            .one(&self.conn)
            .await
            .context("Failed to query user by API key")?;

        Ok(user.map(Account::from))
    }

    pub async fn update_time_period(&self, id: i32, period: Option<i32>) -> Result<Account> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for time period update")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))?;

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: users::ActiveModel = user.into();
        active.saved_search_time_period = Set(period);
        active.updated_at = Set(now);
        let model = active.update(&self.conn).await?;

        Ok(Account::from(model))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete user")?;

        Ok(result.rows_affected > 0)
    }
}
