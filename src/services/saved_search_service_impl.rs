//! The two [`SavedSearchStore`] backends.

use async_trait::async_trait;
use tracing::debug;

use crate::db::Store;
use crate::models::{NewSavedSearch, SavedSearch, next_user_order, validate_time_period};
use crate::services::demo_session::DemoSession;
use crate::services::saved_search_service::{SavedSearchError, SavedSearchStore};

/// Rows in the `saved_searches` table, scoped to one owner.
pub struct DatabaseSavedSearches {
    store: Store,
    user_id: i32,
}

impl DatabaseSavedSearches {
    #[must_use]
    pub const fn new(store: Store, user_id: i32) -> Self {
        Self { store, user_id }
    }
}

#[async_trait]
impl SavedSearchStore for DatabaseSavedSearches {
    async fn list_all(&self) -> Result<Vec<SavedSearch>, SavedSearchError> {
        Ok(self.store.list_saved_searches(self.user_id).await?)
    }

    async fn create(&self, search: NewSavedSearch) -> Result<SavedSearch, SavedSearchError> {
        let time_period = validate_time_period(search.time_period)?;

        let user_order = match search.user_order {
            Some(order) => order,
            None => next_user_order(self.store.max_saved_search_order(self.user_id).await?)?,
        };

        let created = self
            .store
            .insert_saved_search(self.user_id, user_order, &search.options, time_period)
            .await?;

        Ok(created)
    }

    async fn find(&self, id: i32) -> Result<Option<SavedSearch>, SavedSearchError> {
        Ok(self.store.find_saved_search(self.user_id, id).await?)
    }

    async fn delete(&self, id: i32) -> Result<bool, SavedSearchError> {
        let deleted = self.store.delete_saved_search(self.user_id, id).await?;
        debug!(user_id = self.user_id, saved_search_id = id, deleted, "Delete saved search");
        Ok(deleted)
    }

    async fn save(&self, search: &SavedSearch) -> Result<bool, SavedSearchError> {
        validate_time_period(search.time_period)?;

        let owned = SavedSearch {
            user_id: self.user_id,
            ..search.clone()
        };
        Ok(self.store.update_saved_search(&owned).await?)
    }
}

/// The list kept in a demo visitor's session. Nothing here touches the database.
pub struct SessionSavedSearches {
    session: DemoSession,
}

impl SessionSavedSearches {
    #[must_use]
    pub const fn new(session: DemoSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl SavedSearchStore for SessionSavedSearches {
    async fn list_all(&self) -> Result<Vec<SavedSearch>, SavedSearchError> {
        let data = self.session.load().await?;
        Ok(data.sorted_searches())
    }

    async fn create(&self, search: NewSavedSearch) -> Result<SavedSearch, SavedSearchError> {
        validate_time_period(search.time_period)?;

        let mut data = self.session.load().await?;
        let created = data.create(self.session.user_id(), search)?;
        self.session.commit(&data).await?;

        Ok(created)
    }

    async fn find(&self, id: i32) -> Result<Option<SavedSearch>, SavedSearchError> {
        let data = self.session.load().await?;
        Ok(data.find(id).cloned())
    }

    async fn delete(&self, id: i32) -> Result<bool, SavedSearchError> {
        let mut data = self.session.load().await?;
        let deleted = data.delete(id);
        if deleted {
            self.session.commit(&data).await?;
        }
        Ok(deleted)
    }

    async fn save(&self, search: &SavedSearch) -> Result<bool, SavedSearchError> {
        validate_time_period(search.time_period)?;

        let mut data = self.session.load().await?;
        data.upsert(SavedSearch {
            user_id: self.session.user_id(),
            ..search.clone()
        });
        self.session.commit(&data).await?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewAccount, Permission, SearchOptions};
    use crate::services::keys::RandomKeyGenerator;
    use crate::services::repos::ConfiguredRepos;
    use std::sync::Arc;
    use tower_sessions::{MemoryStore, Session};

    fn new_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    async fn memory_store() -> Store {
        Store::with_pool_options("sqlite::memory:", 1, 1)
            .await
            .expect("in-memory store")
    }

    async fn normal_user(store: &Store, email: &str) -> i32 {
        store
            .create_user(
                &NewAccount {
                    email: email.to_string(),
                    username: email.to_string(),
                    permission: Permission::Normal,
                },
                &RandomKeyGenerator,
            )
            .await
            .unwrap()
            .id
    }

    async fn demo_backend(user_id: i32) -> SessionSavedSearches {
        let session = DemoSession::initialize(
            new_session(),
            user_id,
            &ConfiguredRepos::default(),
            "barkeep",
        )
        .await
        .unwrap();
        SessionSavedSearches::new(session)
    }

    #[tokio::test]
    async fn test_session_ids_increment_from_one() {
        let backend = demo_backend(7).await;

        let mut ids = Vec::new();
        for repo in ["a", "b", "c", "d"] {
            let created = backend
                .create(SearchOptions::for_repo(repo).into())
                .await
                .unwrap();
            assert_eq!(created.user_id, 7);
            ids.push(created.id);
        }

        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_session_list_is_rank_descending() {
        let backend = demo_backend(1).await;
        for order in [2, 9, 4] {
            backend
                .create(NewSavedSearch {
                    user_order: Some(order),
                    ..NewSavedSearch::default()
                })
                .await
                .unwrap();
        }

        let orders: Vec<i32> = backend
            .list_all()
            .await
            .unwrap()
            .iter()
            .map(|s| s.user_order)
            .collect();
        assert_eq!(orders, vec![9, 4, 2]);
    }

    #[tokio::test]
    async fn test_session_create_ranks_above_existing() {
        let backend = demo_backend(1).await;
        let first = backend.create(NewSavedSearch::default()).await.unwrap();
        assert_eq!(first.user_order, 0);

        backend
            .create(NewSavedSearch {
                user_order: Some(10),
                ..NewSavedSearch::default()
            })
            .await
            .unwrap();

        let next = backend.create(NewSavedSearch::default()).await.unwrap();
        assert_eq!(next.user_order, 11);
    }

    #[tokio::test]
    async fn test_session_create_after_max_rank_is_rejected() {
        let backend = demo_backend(1).await;
        backend
            .create(NewSavedSearch {
                user_order: Some(i32::MAX),
                ..NewSavedSearch::default()
            })
            .await
            .unwrap();

        let err = backend.create(NewSavedSearch::default()).await.unwrap_err();
        assert!(matches!(err, SavedSearchError::Validation(ref e) if e.field == "user_order"));

        let all = backend.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].user_order, i32::MAX);
    }

    #[tokio::test]
    async fn test_database_create_after_max_rank_is_rejected() {
        let store = memory_store().await;
        let user_id = normal_user(&store, "alice@example.com").await;
        let backend = DatabaseSavedSearches::new(store, user_id);

        backend
            .create(NewSavedSearch {
                user_order: Some(i32::MAX),
                ..NewSavedSearch::default()
            })
            .await
            .unwrap();

        let err = backend.create(NewSavedSearch::default()).await.unwrap_err();
        assert!(matches!(err, SavedSearchError::Validation(ref e) if e.field == "user_order"));
        assert_eq!(backend.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_session_delete_removes_only_match() {
        let backend = demo_backend(1).await;
        for repo in ["a", "b", "c"] {
            backend
                .create(SearchOptions::for_repo(repo).into())
                .await
                .unwrap();
        }

        assert!(backend.delete(2).await.unwrap());
        assert!(!backend.delete(2).await.unwrap());

        let mut remaining: Vec<i32> = backend
            .list_all()
            .await
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();
        remaining.sort_unstable();
        assert_eq!(remaining, vec![1, 3]);
        assert!(backend.find(2).await.unwrap().is_none());
        assert!(backend.find(3).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_session_save_replaces_existing_entry() {
        let backend = demo_backend(1).await;
        let mut search = backend
            .create(SearchOptions::for_repo("barkeep").into())
            .await
            .unwrap();

        search.options.authors = Some("alice".to_string());
        assert!(backend.save(&search).await.unwrap());
        assert!(backend.save(&search).await.unwrap());

        let all = backend.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].options.authors.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_invalid_time_period_is_rejected() {
        let backend = demo_backend(1).await;
        let err = backend
            .create(NewSavedSearch {
                time_period: Some(5),
                ..NewSavedSearch::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SavedSearchError::Validation(ref e) if e.field == "saved_search_time_period"));
        assert!(backend.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_database_create_ranks_and_lists() {
        let store = memory_store().await;
        let user_id = normal_user(&store, "alice@example.com").await;
        let backend = DatabaseSavedSearches::new(store, user_id);

        let first = backend
            .create(SearchOptions::for_repo("a").into())
            .await
            .unwrap();
        let second = backend
            .create(SearchOptions::for_repo("b").into())
            .await
            .unwrap();

        assert_eq!(first.user_order, 0);
        assert_eq!(second.user_order, 1);

        let listed: Vec<i32> = backend.list_all().await.unwrap().iter().map(|s| s.id).collect();
        assert_eq!(listed, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_database_delete_and_save_are_owner_scoped() {
        let store = memory_store().await;
        let alice = normal_user(&store, "alice@example.com").await;
        let bob = normal_user(&store, "bob@example.com").await;

        let alice_searches = DatabaseSavedSearches::new(store.clone(), alice);
        let bob_searches = DatabaseSavedSearches::new(store.clone(), bob);

        let mut search = alice_searches
            .create(SearchOptions::for_repo("barkeep").into())
            .await
            .unwrap();

        assert!(bob_searches.find(search.id).await.unwrap().is_none());
        assert!(!bob_searches.delete(search.id).await.unwrap());

        search.options.branches = Some("master".to_string());
        assert!(!bob_searches.save(&search).await.unwrap());
        assert!(alice_searches.save(&search).await.unwrap());

        let stored = alice_searches.find(search.id).await.unwrap().unwrap();
        assert_eq!(stored.options.branches.as_deref(), Some("master"));
        assert_eq!(stored.user_id, alice);
    }
}
