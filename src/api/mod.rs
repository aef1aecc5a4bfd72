use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, Session, SessionManagerLayer};

use crate::config::Config;
use crate::models::Account;
use crate::services::{AccountService, SavedSearchStore, saved_search_store_for};
use crate::state::SharedState;

mod accounts;
pub mod auth;
mod error;
mod observability;
mod saved_searches;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn accounts(&self) -> &Arc<dyn AccountService> {
        &self.shared.account_service
    }

    /// Saved searches of `account`, backed by the session for demo accounts.
    #[must_use]
    pub fn saved_searches(&self, account: &Account, session: &Session) -> Box<dyn SavedSearchStore> {
        saved_search_store_for(account, self.store(), session)
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let config = state.config();
    let cors_origins = config.server.cors_allowed_origins.clone();

    // Demo visitors keep their saved searches in the session, so it has to
    // outlive a browsing session by a wide margin.
    let session_store = state.store().session_store();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(config.server.secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(
            config.demo.session_expiry_days,
        )));

    let protected_routes = create_protected_router(state.clone());

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/auth/demo", post(auth::demo_login))
        .route("/auth/logout", post(auth::logout))
        .route("/health", get(observability::health))
        .layer(session_layer)
        .with_state(state.clone());

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/me", get(accounts::get_me))
        .route("/me/time_period", put(accounts::update_time_period))
        .route("/users", post(accounts::create_user))
        .route("/users/{id}", delete(accounts::delete_user))
        .route("/saved_searches", get(saved_searches::list_saved_searches))
        .route("/saved_searches", post(saved_searches::create_saved_search))
        .route("/saved_searches/{id}", get(saved_searches::get_saved_search))
        .route(
            "/saved_searches/{id}",
            put(saved_searches::update_saved_search),
        )
        .route(
            "/saved_searches/{id}",
            delete(saved_searches::delete_saved_search),
        )
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
