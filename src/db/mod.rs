use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tower_sessions_sqlx_store::SqliteStore;
use tracing::info;

use crate::models::{Account, NewAccount, SavedSearch, SearchOptions};
use crate::services::keys::KeyGenerator;

pub mod migrator;
pub mod repositories;

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

        let path_str = db_url.trim_start_matches("sqlite:");
        if !path_str.starts_with(":memory:") {
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

        SqliteStore::new(conn.get_sqlite_connection_pool().clone())
            .migrate()
            .await
            .context("Failed to create session table")?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    /// Session store backed by the same database, so demo visitors keep their
    /// saved searches across restarts.
    #[must_use]
    pub fn session_store(&self) -> SqliteStore {
        SqliteStore::new(self.conn.get_sqlite_connection_pool().clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn saved_search_repo(&self) -> repositories::saved_search::SavedSearchRepository {
        repositories::saved_search::SavedSearchRepository::new(self.conn.clone())
    }

    // Users

    pub async fn create_user(
        &self,
        account: &NewAccount,
        keys: &dyn KeyGenerator,
    ) -> Result<Account> {
        self.user_repo().create(account, keys).await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<Account>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<Account>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_demo_user(&self) -> Result<Option<Account>> {
        self.user_repo().get_demo().await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<Account>> {
        self.user_repo().verify_api_key(api_key).await
    }

    pub async fn update_user_time_period(&self, id: i32, period: Option<i32>) -> Result<Account> {
        self.user_repo().update_time_period(id, period).await
    }

    pub async fn delete_user(&self, id: i32) -> Result<bool> {
        self.user_repo().delete(id).await
    }

    // Saved searches

    pub async fn list_saved_searches(&self, user_id: i32) -> Result<Vec<SavedSearch>> {
        self.saved_search_repo().list_for_user(user_id).await
    }

    pub async fn find_saved_search(&self, user_id: i32, id: i32) -> Result<Option<SavedSearch>> {
        self.saved_search_repo().find_for_user(user_id, id).await
    }

    pub async fn max_saved_search_order(&self, user_id: i32) -> Result<Option<i32>> {
        self.saved_search_repo().max_order_for_user(user_id).await
    }

    pub async fn insert_saved_search(
        &self,
        user_id: i32,
        user_order: i32,
        options: &SearchOptions,
        time_period: Option<i32>,
    ) -> Result<SavedSearch> {
        self.saved_search_repo()
            .insert(user_id, user_order, options, time_period)
            .await
    }

    pub async fn update_saved_search(&self, search: &SavedSearch) -> Result<bool> {
        self.saved_search_repo().update_for_user(search).await
    }

    pub async fn delete_saved_search(&self, user_id: i32, id: i32) -> Result<bool> {
        self.saved_search_repo().delete_for_user(user_id, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Permission;
    use crate::services::keys::RandomKeyGenerator;

    async fn memory_store() -> Store {
        Store::with_pool_options("sqlite::memory:", 1, 1)
            .await
            .expect("in-memory store")
    }

    #[tokio::test]
    async fn test_demo_user_is_seeded() {
        let store = memory_store().await;
        let demo = store.get_demo_user().await.unwrap().expect("demo user");
        assert!(demo.is_demo());
        assert_eq!(demo.email, "demo@example.com");
        assert_eq!(demo.api_key.len(), 64);
        assert_ne!(demo.api_key, demo.api_secret);
    }

    #[tokio::test]
    async fn test_create_user_assigns_credentials() {
        let store = memory_store().await;
        let account = store
            .create_user(
                &NewAccount {
                    email: "alice@example.com".to_string(),
                    username: "alice".to_string(),
                    permission: Permission::Admin,
                },
                &RandomKeyGenerator,
            )
            .await
            .unwrap();

        assert!(account.is_admin());
        assert!(!account.api_key.is_empty());
        assert!(!account.api_secret.is_empty());
        assert_ne!(account.api_key, account.api_secret);

        let found = store.verify_api_key(&account.api_key).await.unwrap();
        assert_eq!(found.map(|a| a.id), Some(account.id));
    }

    async fn session_rows(store: &Store) -> i64 {
        let backend = store.conn.get_database_backend();
        let row = store
            .conn
            .query_one(Statement::from_string(
                backend,
                "SELECT COUNT(*) AS n FROM tower_sessions".to_string(),
            ))
            .await
            .unwrap()
            .unwrap();
        row.try_get("", "n").unwrap()
    }

    #[tokio::test]
    async fn test_expired_sessions_are_purged() {
        use std::collections::HashMap;
        use time::{Duration as TimeDuration, OffsetDateTime};
        use tower_sessions::session::{Id, Record};
        use tower_sessions::session_store::{ExpiredDeletion, SessionStore};

        let store = memory_store().await;
        let sessions = store.session_store();

        let mut live = Record {
            id: Id::default(),
            data: HashMap::new(),
            expiry_date: OffsetDateTime::now_utc() + TimeDuration::days(365),
        };
        let mut stale = Record {
            id: Id::default(),
            data: HashMap::new(),
            expiry_date: OffsetDateTime::now_utc() - TimeDuration::days(1),
        };
        sessions.create(&mut live).await.unwrap();
        sessions.create(&mut stale).await.unwrap();
        assert_eq!(session_rows(&store).await, 2);

        sessions.delete_expired().await.unwrap();

        assert_eq!(session_rows(&store).await, 1);
        assert!(sessions.load(&live.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_is_scoped_to_owner() {
        let store = memory_store().await;
        let keys = RandomKeyGenerator;
        let alice = store
            .create_user(
                &NewAccount {
                    email: "alice@example.com".to_string(),
                    username: "alice".to_string(),
                    permission: Permission::Normal,
                },
                &keys,
            )
            .await
            .unwrap();
        let bob = store
            .create_user(
                &NewAccount {
                    email: "bob@example.com".to_string(),
                    username: "bob".to_string(),
                    permission: Permission::Normal,
                },
                &keys,
            )
            .await
            .unwrap();

        let search = store
            .insert_saved_search(alice.id, 0, &SearchOptions::for_repo("barkeep"), None)
            .await
            .unwrap();

        assert!(!store.delete_saved_search(bob.id, search.id).await.unwrap());
        assert!(store.find_saved_search(alice.id, search.id).await.unwrap().is_some());

        assert!(store.delete_saved_search(alice.id, search.id).await.unwrap());
        assert!(store.find_saved_search(alice.id, search.id).await.unwrap().is_none());
    }
}
