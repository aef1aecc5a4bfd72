use axum::{
    Extension, Json,
    extract::{Path, State},
};
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::{CurrentAccount, require_admin};
use super::{AccountDto, ApiError, ApiResponse, AppState, CreatedAccountDto, TimePeriodRequest};
use crate::models::NewAccount;

/// GET /me
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
    session: Session,
) -> Result<Json<ApiResponse<AccountDto>>, ApiError> {
    let time_period = state.accounts().time_period(&account, &session).await?;
    Ok(Json(ApiResponse::success(AccountDto::new(
        &account,
        &state.config().avatars,
        time_period,
    ))))
}

/// PUT /me/time_period
pub async fn update_time_period(
    State(state): State<Arc<AppState>>,
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
    session: Session,
    Json(payload): Json<TimePeriodRequest>,
) -> Result<Json<ApiResponse<AccountDto>>, ApiError> {
    let time_period = state
        .accounts()
        .set_time_period(&account, &session, payload.saved_search_time_period)
        .await?;

    Ok(Json(ApiResponse::success(AccountDto::new(
        &account,
        &state.config().avatars,
        time_period,
    ))))
}

/// POST /users (admin only)
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentAccount>,
    Json(payload): Json<NewAccount>,
) -> Result<Json<ApiResponse<CreatedAccountDto>>, ApiError> {
    require_admin(&current)?;

    let account = state.accounts().create_account(payload).await?;
    let dto = CreatedAccountDto {
        account: AccountDto::new(
            &account,
            &state.config().avatars,
            account.saved_search_time_period,
        ),
        api_key: account.api_key.clone(),
        api_secret: account.api_secret.clone(),
    };

    Ok(Json(ApiResponse::success(dto)))
}

/// DELETE /users/{id} (admin only)
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    require_admin(&current)?;

    if current.0.id == id {
        return Err(ApiError::validation("You cannot delete your own account"));
    }

    if state.accounts().delete_account(id).await? {
        Ok(Json(ApiResponse::success(true)))
    } else {
        Err(ApiError::not_found("User", id))
    }
}
