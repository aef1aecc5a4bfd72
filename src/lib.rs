pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod entities;
pub mod models;
pub mod services;
pub mod state;

use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower_sessions::session_store::ExpiredDeletion;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
pub use config::Config;
use models::Permission;
use state::SharedState;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run(config: Config) -> anyhow::Result<()> {
    config.validate()?;

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        Some(handle)
    } else {
        None
    };

    init_tracing(&config.general.log_level);

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) | None => run_server(config, prometheus_handle).await,

        Some(Commands::CreateUser {
            email,
            username,
            admin,
        }) => {
            let permission = if admin {
                Permission::Admin
            } else {
                Permission::Normal
            };
            cli::cmd_create_user(&config, &email, &username, permission).await
        }

        Some(Commands::ListSearches { email }) => cli::cmd_list_searches(&config, &email).await,

        Some(Commands::Init) => cli::cmd_init(),
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn run_server(
    config: Config,
    prometheus_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
) -> anyhow::Result<()> {
    info!("Barkeep v{} starting...", env!("CARGO_PKG_VERSION"));

    if !config.server.enabled {
        info!("Web API disabled in config, nothing to do");
        return Ok(());
    }

    let port = config.server.port;
    let cleanup_interval = Duration::from_secs(config.demo.session_cleanup_minutes * 60);
    let shared = Arc::new(SharedState::new(config).await?);

    let sessions = shared.store.session_store();
    let cleanup_task = tokio::spawn(async move {
        if let Err(e) = sessions.continuously_delete_expired(cleanup_interval).await {
            error!("Expired session cleanup stopped: {}", e);
        }
    });

    let api_state = api::create_app_state(shared, prometheus_handle);
    let app = api::router(api_state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Web server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cleanup_task.abort();
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}
