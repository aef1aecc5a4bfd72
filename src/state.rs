use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AccountService, ConfiguredRepos, KeyGenerator, RandomKeyGenerator, RepoRegistry,
    SeaOrmAccountService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub account_service: Arc<dyn AccountService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store, Arc::new(RandomKeyGenerator)))
    }

    /// Wires services around an already connected store.
    #[must_use]
    pub fn with_store(config: Config, store: Store, keys: Arc<dyn KeyGenerator>) -> Self {
        let repos: Arc<dyn RepoRegistry> = Arc::new(ConfiguredRepos::from(&config.repos));

        let account_service: Arc<dyn AccountService> = Arc::new(SeaOrmAccountService::new(
            store.clone(),
            keys,
            repos,
            config.demo.default_repo.clone(),
        ));

        Self {
            config: Arc::new(config),
            store,
            account_service,
        }
    }
}
