//! List saved searches command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_list_searches(config: &Config, email: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let Some(account) = store.get_user_by_email(email).await? else {
        println!("No account found for {email}");
        return Ok(());
    };

    if account.is_demo() {
        println!("{} is a demo account; its saved searches live in visitor sessions.", email);
        return Ok(());
    }

    let searches = store.list_saved_searches(account.id).await?;

    if searches.is_empty() {
        println!("{} has no saved searches.", account.username);
        return Ok(());
    }

    println!("Saved searches for {} ({} total)", account.username, searches.len());
    println!("{:-<70}", "");

    for search in searches {
        let period = search
            .time_period
            .map_or_else(|| "all time".to_string(), |d| format!("last {d} days"));
        println!("#{:<4} [{}] {}", search.id, search.user_order, search.title());
        println!("      {}", period);
    }

    Ok(())
}
