//! `SeaORM` implementation of the `AccountService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tower_sessions::Session;
use tracing::info;

use crate::db::Store;
use crate::models::{Account, FieldError, NewAccount, Permission, validate_time_period};
use crate::services::account_service::{AccountError, AccountService};
use crate::services::demo_session::DemoSession;
use crate::services::keys::KeyGenerator;
use crate::services::repos::RepoRegistry;

pub struct SeaOrmAccountService {
    store: Store,
    keys: Arc<dyn KeyGenerator>,
    repos: Arc<dyn RepoRegistry>,
    default_repo: String,
}

impl SeaOrmAccountService {
    #[must_use]
    pub fn new(
        store: Store,
        keys: Arc<dyn KeyGenerator>,
        repos: Arc<dyn RepoRegistry>,
        default_repo: impl Into<String>,
    ) -> Self {
        Self {
            store,
            keys,
            repos,
            default_repo: default_repo.into(),
        }
    }

    fn validate_new_account(account: &NewAccount) -> Result<(), FieldError> {
        let email = account.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(FieldError::invalid("email"));
        }
        if account.username.trim().is_empty() {
            return Err(FieldError {
                field: "username",
                message: "is required".to_string(),
            });
        }
        // The demo account is seeded once and shared by every visitor.
        if account.permission == Permission::Demo {
            return Err(FieldError::invalid("permission"));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountService for SeaOrmAccountService {
    async fn create_account(&self, account: NewAccount) -> Result<Account, AccountError> {
        Self::validate_new_account(&account)?;

        let account = NewAccount {
            email: account.email.trim().to_string(),
            username: account.username.trim().to_string(),
            ..account
        };

        if self.store.get_user_by_email(&account.email).await?.is_some() {
            return Err(AccountError::Conflict(format!(
                "An account for {} already exists",
                account.email
            )));
        }

        let created = self.store.create_user(&account, self.keys.as_ref()).await?;
        info!(user_id = created.id, username = %created.username, "Account created");
        Ok(created)
    }

    async fn get_account(&self, id: i32) -> Result<Account, AccountError> {
        self.store.get_user(id).await?.ok_or(AccountError::NotFound)
    }

    async fn find_by_api_key(&self, api_key: &str) -> Result<Option<Account>, AccountError> {
        Ok(self.store.verify_api_key(api_key).await?)
    }

    async fn demo_account(&self) -> Result<Account, AccountError> {
        self.store.get_demo_user().await?.ok_or(AccountError::NotFound)
    }

    async fn prepare_session(
        &self,
        account: &Account,
        session: &Session,
    ) -> Result<(), AccountError> {
        if !account.is_demo() {
            return Ok(());
        }

        DemoSession::initialize(
            session.clone(),
            account.id,
            self.repos.as_ref(),
            &self.default_repo,
        )
        .await?;
        Ok(())
    }

    async fn time_period(
        &self,
        account: &Account,
        session: &Session,
    ) -> Result<Option<i32>, AccountError> {
        if account.is_demo() {
            let data = DemoSession::new(session.clone(), account.id).load().await?;
            return Ok(data.saved_search_time_period);
        }
        Ok(account.saved_search_time_period)
    }

    async fn set_time_period(
        &self,
        account: &Account,
        session: &Session,
        period: Option<i32>,
    ) -> Result<Option<i32>, AccountError> {
        let period = validate_time_period(period)?;

        if account.is_demo() {
            let demo = DemoSession::new(session.clone(), account.id);
            let mut data = demo.load().await?;
            data.saved_search_time_period = period;
            demo.commit(&data).await?;
            return Ok(period);
        }

        let updated = self.store.update_user_time_period(account.id, period).await?;
        Ok(updated.saved_search_time_period)
    }

    async fn delete_account(&self, id: i32) -> Result<bool, AccountError> {
        let Some(account) = self.store.get_user(id).await? else {
            return Ok(false);
        };
        if account.is_demo() {
            return Err(AccountError::Conflict(
                "The demo account cannot be deleted".to_string(),
            ));
        }

        let deleted = self.store.delete_user(id).await?;
        if deleted {
            info!(user_id = id, "Account deleted");
        }
        Ok(deleted)
    }
}
