use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;
use tower_sessions::Session;

use super::{AccountDto, ApiError, ApiResponse, AppState};
use crate::models::Account;

/// Session key holding the logged-in account's id.
pub const SESSION_USER_KEY: &str = "user_id";

/// The account resolved by [`auth_middleware`] for the current request.
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Account);

// ============================================================================
// Middleware
// ============================================================================

/// Authentication middleware that checks:
/// 1. Session cookie (from login)
/// 2. `X-Api-Key` header
/// 3. `Authorization: Bearer <api_key>` header
///
/// Demo sessions are prepared here, so handlers can rely on the session
/// holding demo state whenever the account is the demo account. The demo
/// account is only reachable through a session cookie; its API key is refused.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let account = match session_account(&state, &session).await? {
        Some(account) => account,
        None => {
            let account = match extract_api_key(&headers) {
                Some(key) => state.accounts().find_by_api_key(&key).await?,
                None => None,
            }
            .ok_or_else(|| ApiError::Unauthorized("Log in or provide an API key".to_string()))?;

            if account.is_demo() {
                return Err(ApiError::Unauthorized(
                    "The demo account is only available through /api/auth/demo".to_string(),
                ));
            }
            account
        }
    };

    state.accounts().prepare_session(&account, &session).await?;

    let current = CurrentAccount(account);
    request.extensions_mut().insert(current.clone());
    let mut response = next.run(request).await;
    response.extensions_mut().insert(current);
    Ok(response)
}

async fn session_account(state: &AppState, session: &Session) -> Result<Option<Account>, ApiError> {
    let user_id = session
        .get::<i32>(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;

    match user_id {
        Some(id) => Ok(state.store().get_user(id).await?),
        None => Ok(None),
    }
}

/// Extract API key from headers
fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    if let Some(api_key) = headers.get("X-Api-Key")
        && let Ok(key_str) = api_key.to_str()
    {
        return Some(key_str.to_string());
    }

    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/demo
/// Log the visitor in as the shared demo account.
pub async fn demo_login(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<AccountDto>>, ApiError> {
    if !state.config().demo.enabled {
        return Err(ApiError::Forbidden("Demo mode is disabled".to_string()));
    }

    let account = state.accounts().demo_account().await?;

    session
        .insert(SESSION_USER_KEY, account.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;
    state.accounts().prepare_session(&account, &session).await?;

    let time_period = state.accounts().time_period(&account, &session).await?;
    tracing::info!(user_id = account.id, "Demo visitor logged in");

    Ok(Json(ApiResponse::success(AccountDto::new(
        &account,
        &state.config().avatars,
        time_period,
    ))))
}

/// POST /auth/logout
/// Invalidate the current session
pub async fn logout(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    (StatusCode::OK, "Logged out")
}

/// Rejects the request unless the current account is an admin.
pub fn require_admin(current: &CurrentAccount) -> Result<(), ApiError> {
    if current.0.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Admin access required".to_string()))
    }
}
