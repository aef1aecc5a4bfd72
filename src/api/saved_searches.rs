use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::CurrentAccount;
use super::validation::{parse_saved_search_id, validate_user_order};
use super::{ApiError, ApiResponse, AppState, SavedSearchDto};
use crate::models::{NewSavedSearch, SearchOptions};

/// Full replacement of a search's filters. `user_order` is kept when omitted.
#[derive(Debug, Deserialize)]
pub struct UpdateSavedSearchRequest {
    #[serde(flatten)]
    pub options: SearchOptions,
    pub user_order: Option<i32>,
    pub time_period: Option<i32>,
}

pub async fn list_saved_searches(
    State(state): State<Arc<AppState>>,
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
    session: Session,
) -> Result<Json<ApiResponse<Vec<SavedSearchDto>>>, ApiError> {
    let searches = state.saved_searches(&account, &session).list_all().await?;
    let dtos = searches.into_iter().map(SavedSearchDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

pub async fn create_saved_search(
    State(state): State<Arc<AppState>>,
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
    session: Session,
    Json(payload): Json<NewSavedSearch>,
) -> Result<Json<ApiResponse<SavedSearchDto>>, ApiError> {
    validate_user_order(payload.user_order)?;

    let created = state
        .saved_searches(&account, &session)
        .create(payload)
        .await?;

    tracing::info!(
        user_id = account.id,
        saved_search_id = created.id,
        demo = account.is_demo(),
        "Saved search created"
    );

    Ok(Json(ApiResponse::success(SavedSearchDto::from(created))))
}

pub async fn get_saved_search(
    State(state): State<Arc<AppState>>,
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
    session: Session,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<SavedSearchDto>>, ApiError> {
    let id = parse_saved_search_id(&raw_id)?;

    let search = state
        .saved_searches(&account, &session)
        .find(id)
        .await?
        .ok_or_else(|| ApiError::saved_search_not_found(id))?;

    Ok(Json(ApiResponse::success(SavedSearchDto::from(search))))
}

pub async fn update_saved_search(
    State(state): State<Arc<AppState>>,
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
    session: Session,
    Path(raw_id): Path<String>,
    Json(payload): Json<UpdateSavedSearchRequest>,
) -> Result<Json<ApiResponse<SavedSearchDto>>, ApiError> {
    let id = parse_saved_search_id(&raw_id)?;
    validate_user_order(payload.user_order)?;

    let searches = state.saved_searches(&account, &session);
    let mut search = searches
        .find(id)
        .await?
        .ok_or_else(|| ApiError::saved_search_not_found(id))?;

    search.options = payload.options;
    if let Some(order) = payload.user_order {
        search.user_order = order;
    }
    search.time_period = payload.time_period;

    if !searches.save(&search).await? {
        return Err(ApiError::saved_search_not_found(id));
    }

    Ok(Json(ApiResponse::success(SavedSearchDto::from(search))))
}

pub async fn delete_saved_search(
    State(state): State<Arc<AppState>>,
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
    session: Session,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    let id = parse_saved_search_id(&raw_id)?;

    let deleted = state.saved_searches(&account, &session).delete(id).await?;
    if deleted {
        Ok(Json(ApiResponse::success(true)))
    } else {
        Err(ApiError::saved_search_not_found(id))
    }
}
