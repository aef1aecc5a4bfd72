//! Domain service for accounts.
//!
//! Handles account creation, demo logins, and the saved-search time period
//! preference, which lives in the session for demo visitors.

use thiserror::Error;
use tower_sessions::Session;

use crate::models::{Account, FieldError, NewAccount};
use crate::services::saved_search_service::SavedSearchError;

/// Errors specific to account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldError),

    #[error("Account not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for AccountError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

impl From<SavedSearchError> for AccountError {
    fn from(err: SavedSearchError) -> Self {
        match err {
            SavedSearchError::Validation(e) => Self::Validation(e),
            SavedSearchError::Session(msg) => Self::Session(msg),
            SavedSearchError::Database(msg) => Self::Database(msg),
        }
    }
}

#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    /// Creates an account with freshly generated API credentials.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Validation`] for a malformed email, an empty
    /// username or a demo permission, and [`AccountError::Conflict`] if the
    /// email is taken.
    async fn create_account(&self, account: NewAccount) -> Result<Account, AccountError>;

    async fn get_account(&self, id: i32) -> Result<Account, AccountError>;

    async fn find_by_api_key(&self, api_key: &str) -> Result<Option<Account>, AccountError>;

    /// The shared account demo visitors log in as.
    async fn demo_account(&self) -> Result<Account, AccountError>;

    /// Prepares `session` for a demo visitor. No-op for other accounts and for
    /// sessions that were already prepared.
    async fn prepare_session(&self, account: &Account, session: &Session)
    -> Result<(), AccountError>;

    /// Effective saved-search time period for the account.
    async fn time_period(
        &self,
        account: &Account,
        session: &Session,
    ) -> Result<Option<i32>, AccountError>;

    /// Validates and stores the saved-search time period.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Validation`] for values outside the allowed set.
    async fn set_time_period(
        &self,
        account: &Account,
        session: &Session,
        period: Option<i32>,
    ) -> Result<Option<i32>, AccountError>;

    /// Removes an account and its saved searches. The demo account is kept.
    async fn delete_account(&self, id: i32) -> Result<bool, AccountError>;
}
