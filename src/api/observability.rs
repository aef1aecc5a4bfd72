use crate::api::{ApiError, ApiResponse, AppState, HealthDto};
use axum::{Json, extract::State, response::IntoResponse};
use std::sync::Arc;

pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.prometheus_handle.as_ref().map_or_else(
        || "Metrics not enabled or failed to initialize".to_string(),
        metrics_exporter_prometheus::PrometheusHandle::render,
    )
}

pub async fn health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<HealthDto>>, ApiError> {
    state
        .store()
        .ping()
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(Json(ApiResponse::success(HealthDto {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })))
}

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{Instrument, Span, info, info_span};
use uuid::Uuid;

use super::auth::CurrentAccount;

/// Low-cardinality label for who made the request.
fn account_kind(account: Option<&CurrentAccount>) -> &'static str {
    match account {
        None => "anonymous",
        Some(CurrentAccount(a)) if a.is_demo() => "demo",
        Some(CurrentAccount(a)) if a.is_admin() => "admin",
        Some(_) => "normal",
    }
}

/// Per-request span, access log line and HTTP metrics. The account resolved
/// by the auth middleware travels back on the response extensions.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let route = req
        .extensions()
        .get::<axum::extract::MatchedPath>()
        .map(|mp| mp.as_str().to_string());

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
        user_id = tracing::field::Empty,
        account = tracing::field::Empty,
    );

    async move {
        let response = next.run(req).await;

        let current = response.extensions().get::<CurrentAccount>();
        let kind = account_kind(current);
        if let Some(CurrentAccount(account)) = current {
            Span::current().record("user_id", account.id);
        }
        Span::current().record("account", kind);

        let status = response.status().as_u16();
        let elapsed = start.elapsed();

        let labels = [
            ("method", method.clone()),
            ("path", route.unwrap_or_else(|| path.clone())),
            ("status", status.to_string()),
            ("account", kind.to_string()),
        ];
        metrics::counter!("http_requests_total", &labels).increment(1);
        metrics::histogram!("http_request_duration_seconds", &labels)
            .record(elapsed.as_secs_f64());

        info!(
            status_code = status,
            duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            "Request finished"
        );

        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::users;
    use crate::models::Account;

    fn current(permission: &str) -> CurrentAccount {
        CurrentAccount(Account::from(users::Model {
            id: 4,
            email: "someone@example.com".to_string(),
            username: "someone".to_string(),
            permission: permission.to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            saved_search_time_period: None,
            created_at: String::new(),
            updated_at: String::new(),
        }))
    }

    #[test]
    fn test_account_kind_labels() {
        assert_eq!(account_kind(None), "anonymous");
        assert_eq!(account_kind(Some(&current("demo"))), "demo");
        assert_eq!(account_kind(Some(&current("admin"))), "admin");
        assert_eq!(account_kind(Some(&current("normal"))), "normal");
    }
}
