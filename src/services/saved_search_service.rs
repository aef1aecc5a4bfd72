//! Domain service for saved searches.
//!
//! Demo accounts keep their saved searches in the session; everyone else keeps
//! them in the database. [`saved_search_store_for`] picks the backend once per
//! account so callers only ever see [`SavedSearchStore`].

use thiserror::Error;
use tower_sessions::Session;

use crate::db::Store;
use crate::models::{Account, FieldError, NewSavedSearch, SavedSearch};
use crate::services::demo_session::DemoSession;
use crate::services::saved_search_service_impl::{DatabaseSavedSearches, SessionSavedSearches};

/// Errors specific to saved search operations.
#[derive(Debug, Error)]
pub enum SavedSearchError {
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldError),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for SavedSearchError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for SavedSearchError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

impl From<tower_sessions::session::Error> for SavedSearchError {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self::Session(err.to_string())
    }
}

/// Saved searches of a single account.
#[async_trait::async_trait]
pub trait SavedSearchStore: Send + Sync {
    /// All of the account's searches, highest `user_order` first.
    async fn list_all(&self) -> Result<Vec<SavedSearch>, SavedSearchError>;

    /// Creates and stores a search owned by the account.
    ///
    /// Without an explicit `user_order` the search is ranked one above the
    /// account's current maximum, or 0 if it has none.
    ///
    /// # Errors
    ///
    /// Returns [`SavedSearchError::Validation`] for an invalid time period.
    async fn create(&self, search: NewSavedSearch) -> Result<SavedSearch, SavedSearchError>;

    async fn find(&self, id: i32) -> Result<Option<SavedSearch>, SavedSearchError>;

    /// Removes the search if the account owns it. Returns whether anything was removed.
    async fn delete(&self, id: i32) -> Result<bool, SavedSearchError>;

    /// Writes back a modified search. Returns false if the account has no
    /// search with that id in a backend that cannot insert on save.
    async fn save(&self, search: &SavedSearch) -> Result<bool, SavedSearchError>;
}

/// Select the backend for `account`: the session for demo accounts, the
/// database for everyone else.
#[must_use]
pub fn saved_search_store_for(
    account: &Account,
    store: &Store,
    session: &Session,
) -> Box<dyn SavedSearchStore> {
    if account.is_demo() {
        Box::new(SessionSavedSearches::new(DemoSession::new(
            session.clone(),
            account.id,
        )))
    } else {
        Box::new(DatabaseSavedSearches::new(store.clone(), account.id))
    }
}
