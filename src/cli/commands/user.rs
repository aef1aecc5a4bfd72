//! Create user command handler

use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::models::{NewAccount, Permission};
use crate::services::RandomKeyGenerator;
use crate::state::SharedState;

pub async fn cmd_create_user(
    config: &Config,
    email: &str,
    username: &str,
    permission: Permission,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let state = SharedState::with_store(config.clone(), store, Arc::new(RandomKeyGenerator));

    let account = state
        .account_service
        .create_account(NewAccount {
            email: email.to_string(),
            username: username.to_string(),
            permission,
        })
        .await?;

    println!("Created {} account #{}", account.permission, account.id);
    println!("  Email:      {}", account.email);
    println!("  Username:   {}", account.username);
    println!("  API key:    {}", account.api_key);
    println!("  API secret: {}", account.api_secret);

    Ok(())
}
