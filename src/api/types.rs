use serde::{Deserialize, Serialize};

use crate::config::AvatarConfig;
use crate::models::{Account, Permission, SavedSearch, SearchOptions};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set when the error concerns a single input field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            field: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            field: None,
        }
    }

    pub fn field_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            ..Self::error(message)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SavedSearchDto {
    pub id: i32,
    pub user_order: i32,
    pub title: String,
    #[serde(flatten)]
    pub options: SearchOptions,
    pub time_period: Option<i32>,
}

impl From<SavedSearch> for SavedSearchDto {
    fn from(search: SavedSearch) -> Self {
        Self {
            title: search.title(),
            id: search.id,
            user_order: search.user_order,
            options: search.options,
            time_period: search.time_period,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AccountDto {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub permission: Permission,
    pub is_demo: bool,
    pub is_admin: bool,
    pub avatar_url: String,
    pub saved_search_time_period: Option<i32>,
    pub created_at: String,
}

impl AccountDto {
    #[must_use]
    pub fn new(account: &Account, avatars: &AvatarConfig, time_period: Option<i32>) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            username: account.username.clone(),
            permission: account.permission,
            is_demo: account.is_demo(),
            is_admin: account.is_admin(),
            avatar_url: account.avatar_url(avatars),
            saved_search_time_period: time_period,
            created_at: account.created_at.clone(),
        }
    }
}

/// Returned once, on creation, so the caller can hand the credentials out.
#[derive(Debug, Serialize)]
pub struct CreatedAccountDto {
    #[serde(flatten)]
    pub account: AccountDto,
    pub api_key: String,
    pub api_secret: String,
}

#[derive(Debug, Deserialize)]
pub struct TimePeriodRequest {
    pub saved_search_time_period: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
}
