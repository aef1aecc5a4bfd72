//! Saved-search state for demo visitors, kept in their session.
//!
//! All demo visitors share one account, so per-visitor state lives in the
//! session: the last synthetic saved-search id handed out, the saved search
//! list itself, and the time period preference.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::debug;

use crate::models::{
    FieldError, NewSavedSearch, ONE_YEAR, SavedSearch, SearchOptions, next_user_order,
};
use crate::services::repos::RepoRegistry;
use crate::services::saved_search_service::SavedSearchError;

/// Session key the whole [`DemoSessionData`] value is stored under.
pub const DEMO_SESSION_KEY: &str = "demo";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoSessionData {
    pub last_demo_saved_search_id: i32,
    pub saved_searches: Vec<SavedSearch>,
    pub saved_search_time_period: Option<i32>,
}

impl Default for DemoSessionData {
    fn default() -> Self {
        Self {
            last_demo_saved_search_id: 0,
            saved_searches: Vec::new(),
            saved_search_time_period: Some(ONE_YEAR),
        }
    }
}

impl DemoSessionData {
    /// Copy of the list ordered by `user_order`, highest first.
    #[must_use]
    pub fn sorted_searches(&self) -> Vec<SavedSearch> {
        let mut searches = self.saved_searches.clone();
        searches.sort_by(|a, b| b.user_order.cmp(&a.user_order));
        searches
    }

    /// Assigns the next synthetic id and appends the search to the list.
    /// Nothing changes when no rank can be assigned.
    pub fn create(
        &mut self,
        user_id: i32,
        search: NewSavedSearch,
    ) -> Result<SavedSearch, FieldError> {
        let user_order = match search.user_order {
            Some(order) => order,
            None => next_user_order(self.saved_searches.iter().map(|s| s.user_order))?,
        };

        self.last_demo_saved_search_id += 1;
        let created = SavedSearch {
            id: self.last_demo_saved_search_id,
            user_id,
            user_order,
            options: search.options,
            time_period: search.time_period,
        };

        self.saved_searches.push(created.clone());
        Ok(created)
    }

    #[must_use]
    pub fn find(&self, id: i32) -> Option<&SavedSearch> {
        self.saved_searches.iter().find(|s| s.id == id)
    }

    /// Removes the first entry with `id`.
    pub fn delete(&mut self, id: i32) -> bool {
        match self.saved_searches.iter().position(|s| s.id == id) {
            Some(index) => {
                self.saved_searches.remove(index);
                true
            }
            None => false,
        }
    }

    /// Replaces the entry with the same id, or appends when there is none.
    pub fn upsert(&mut self, search: SavedSearch) {
        match self.saved_searches.iter_mut().find(|s| s.id == search.id) {
            Some(existing) => *existing = search,
            None => self.saved_searches.push(search),
        }
    }
}

/// A demo visitor's session, bound to the demo account's id.
#[derive(Clone)]
pub struct DemoSession {
    session: Session,
    user_id: i32,
}

impl DemoSession {
    #[must_use]
    pub const fn new(session: Session, user_id: i32) -> Self {
        Self { session, user_id }
    }

    /// Seeds a session that has no demo state yet. Sessions that already carry
    /// state are left untouched.
    ///
    /// A fresh session gets one default saved search for `default_repo` when
    /// the registry knows that repository, so the visitor has something to
    /// click on before searching.
    pub async fn initialize(
        session: Session,
        user_id: i32,
        repos: &dyn RepoRegistry,
        default_repo: &str,
    ) -> Result<Self, SavedSearchError> {
        let demo = Self::new(session, user_id);

        if demo.session.get::<DemoSessionData>(DEMO_SESSION_KEY).await?.is_some() {
            return Ok(demo);
        }

        let mut data = DemoSessionData::default();
        if repos.contains(default_repo) {
            data.create(user_id, SearchOptions::for_repo(default_repo).into())?;
        }

        debug!(
            user_id,
            default_searches = data.saved_searches.len(),
            "Initialized demo session"
        );
        demo.commit(&data).await?;

        Ok(demo)
    }

    #[must_use]
    pub const fn user_id(&self) -> i32 {
        self.user_id
    }

    /// Current state, or a fresh default if the session was never initialized.
    pub async fn load(&self) -> Result<DemoSessionData, SavedSearchError> {
        Ok(self
            .session
            .get::<DemoSessionData>(DEMO_SESSION_KEY)
            .await?
            .unwrap_or_default())
    }

    pub async fn commit(&self, data: &DemoSessionData) -> Result<(), SavedSearchError> {
        self.session.insert(DEMO_SESSION_KEY, data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::repos::ConfiguredRepos;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    fn new_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_fresh_session_with_barkeep_repo_gets_default_search() {
        let repos = ConfiguredRepos::new(["barkeep"]);
        let demo = DemoSession::initialize(new_session(), 3, &repos, "barkeep")
            .await
            .unwrap();

        let data = demo.load().await.unwrap();
        assert_eq!(data.saved_searches.len(), 1);
        let default = &data.saved_searches[0];
        assert_eq!(default.id, 1);
        assert_eq!(default.user_id, 3);
        assert_eq!(default.user_order, 0);
        assert_eq!(default.options.repos.as_deref(), Some("barkeep"));
        assert_eq!(data.last_demo_saved_search_id, 1);
        assert_eq!(data.saved_search_time_period, Some(ONE_YEAR));
    }

    #[tokio::test]
    async fn test_fresh_session_without_repo_starts_empty() {
        let repos = ConfiguredRepos::new(["linux"]);
        let demo = DemoSession::initialize(new_session(), 3, &repos, "barkeep")
            .await
            .unwrap();

        let data = demo.load().await.unwrap();
        assert!(data.saved_searches.is_empty());
        assert_eq!(data.last_demo_saved_search_id, 0);
        assert_eq!(data.saved_search_time_period, Some(ONE_YEAR));
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let session = new_session();
        let repos = ConfiguredRepos::new(["barkeep"]);

        let demo = DemoSession::initialize(session.clone(), 3, &repos, "barkeep")
            .await
            .unwrap();
        let mut data = demo.load().await.unwrap();
        data.saved_search_time_period = None;
        demo.commit(&data).await.unwrap();

        let again = DemoSession::initialize(session, 3, &repos, "barkeep")
            .await
            .unwrap();
        let reloaded = again.load().await.unwrap();
        assert_eq!(reloaded.saved_searches.len(), 1);
        assert_eq!(reloaded.saved_search_time_period, None);
    }

    #[test]
    fn test_upsert_never_duplicates() {
        let mut data = DemoSessionData::default();
        let mut search = data.create(1, NewSavedSearch::default()).unwrap();

        search.options.paths = Some("lib/".to_string());
        data.upsert(search.clone());
        data.upsert(search);

        assert_eq!(data.saved_searches.len(), 1);
        assert_eq!(data.saved_searches[0].options.paths.as_deref(), Some("lib/"));
    }

    #[test]
    fn test_upsert_appends_unknown_id() {
        let mut data = DemoSessionData::default();
        data.create(1, NewSavedSearch::default()).unwrap();
        let mut other = data.saved_searches[0].clone();
        other.id = 42;
        data.upsert(other);
        assert_eq!(data.saved_searches.len(), 2);
    }
}
