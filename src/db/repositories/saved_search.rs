use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use crate::entities::{prelude::*, saved_searches};
use crate::models::{SavedSearch, SearchOptions};

/// Repository for saved searches of non-demo accounts. Every query is scoped
/// to the owning user.
pub struct SavedSearchRepository {
    conn: DatabaseConnection,
}

impl SavedSearchRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<SavedSearch>> {
        let rows = SavedSearches::find()
            .filter(saved_searches::Column::UserId.eq(user_id))
            .order_by_desc(saved_searches::Column::UserOrder)
            .all(&self.conn)
            .await
            .context("Failed to list saved searches")?;

        Ok(rows.into_iter().map(SavedSearch::from).collect())
    }

    pub async fn find_for_user(&self, user_id: i32, id: i32) -> Result<Option<SavedSearch>> {
        let row = SavedSearches::find_by_id(id)
            .filter(saved_searches::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .context("Failed to query saved search")?;

        Ok(row.map(SavedSearch::from))
    }

    pub async fn max_order_for_user(&self, user_id: i32) -> Result<Option<i32>> {
        let row = SavedSearches::find()
            .filter(saved_searches::Column::UserId.eq(user_id))
            .order_by_desc(saved_searches::Column::UserOrder)
            .one(&self.conn)
            .await
            .context("Failed to query saved search order")?;

        Ok(row.map(|r| r.user_order))
    }

    pub async fn insert(
        &self,
        user_id: i32,
        user_order: i32,
        options: &SearchOptions,
        time_period: Option<i32>,
    ) -> Result<SavedSearch> {
        let active = saved_searches::ActiveModel {
            user_id: Set(user_id),
            user_order: Set(user_order),
            repos: Set(options.repos.clone()),
            branches: Set(options.branches.clone()),
            authors: Set(options.authors.clone()),
            paths: Set(options.paths.clone()),
            messages: Set(options.messages.clone()),
            unapproved_only: Set(options.unapproved_only),
            time_period: Set(time_period),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert saved search")?;

        debug!(user_id, saved_search_id = model.id, "Inserted saved search");
        Ok(SavedSearch::from(model))
    }

    /// Overwrite a row with the given values. Returns false when the row does
    /// not exist or belongs to another user.
    pub async fn update_for_user(&self, search: &SavedSearch) -> Result<bool> {
        let Some(existing) = SavedSearches::find_by_id(search.id)
            .filter(saved_searches::Column::UserId.eq(search.user_id))
            .one(&self.conn)
            .await
            .context("Failed to query saved search for update")?
        else {
            return Ok(false);
        };

        let mut active: saved_searches::ActiveModel = existing.into();
        active.user_order = Set(search.user_order);
        active.repos = Set(search.options.repos.clone());
        active.branches = Set(search.options.branches.clone());
        active.authors = Set(search.options.authors.clone());
        active.paths = Set(search.options.paths.clone());
        active.messages = Set(search.options.messages.clone());
        active.unapproved_only = Set(search.options.unapproved_only);
        active.time_period = Set(search.time_period);
        active
            .update(&self.conn)
            .await
            .context("Failed to update saved search")?;

        Ok(true)
    }

    /// Delete filtered by owner and id, so one user can never remove another's search.
    pub async fn delete_for_user(&self, user_id: i32, id: i32) -> Result<bool> {
        let result = SavedSearches::delete_many()
            .filter(saved_searches::Column::UserId.eq(user_id))
            .filter(saved_searches::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to delete saved search")?;

        Ok(result.rows_affected > 0)
    }
}
