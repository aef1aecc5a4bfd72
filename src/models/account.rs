use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::config::AvatarConfig;
use crate::entities::users;

/// Access level stored in the `permission` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    #[default]
    Normal,
    Admin,
    Demo,
}

impl Permission {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Admin => "admin",
            Self::Demo => "demo",
        }
    }

    /// Anything other than the two privileged literals is a normal account.
    #[must_use]
    pub fn from_stored(value: &str) -> Self {
        match value {
            "admin" => Self::Admin,
            "demo" => Self::Demo,
            _ => Self::Normal,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account as seen by services and handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub permission: Permission,
    pub api_key: String,
    pub api_secret: String,
    pub saved_search_time_period: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<users::Model> for Account {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            permission: Permission::from_stored(&model.permission),
            email: model.email,
            username: model.username,
            api_key: model.api_key,
            api_secret: model.api_secret,
            saved_search_time_period: model.saved_search_time_period,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl Account {
    #[must_use]
    pub fn is_demo(&self) -> bool {
        self.permission == Permission::Demo
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.permission == Permission::Admin
    }

    /// Demo accounts get a bundled image; everyone else gets a Gravatar URL
    /// keyed on the hash of their lower-cased email.
    #[must_use]
    pub fn avatar_url(&self, config: &AvatarConfig) -> String {
        if self.is_demo() {
            return config.demo_avatar_path.clone();
        }
        let digest = Sha256::digest(self.email.trim().to_lowercase().as_bytes());
        format!(
            "{}/{}",
            config.gravatar_base_url.trim_end_matches('/'),
            hex::encode(digest)
        )
    }
}

/// Input for creating an account. Credentials are generated by the repository.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub permission: Permission,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(permission: &str, email: &str) -> Account {
        Account::from(users::Model {
            id: 1,
            email: email.to_string(),
            username: "someone".to_string(),
            permission: permission.to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            saved_search_time_period: None,
            created_at: String::new(),
            updated_at: String::new(),
        })
    }

    #[test]
    fn test_role_predicates_are_exclusive() {
        for (stored, demo, admin) in [
            ("demo", true, false),
            ("admin", false, true),
            ("normal", false, false),
            ("", false, false),
            ("Admin", false, false),
        ] {
            let acct = account(stored, "a@example.com");
            assert_eq!(acct.is_demo(), demo, "demo? for {stored:?}");
            assert_eq!(acct.is_admin(), admin, "admin? for {stored:?}");
            assert!(!(acct.is_demo() && acct.is_admin()));
        }
    }

    #[test]
    fn test_demo_avatar_is_static_asset() {
        let config = AvatarConfig::default();
        let acct = account("demo", "demo@example.com");
        assert_eq!(acct.avatar_url(&config), "/assets/images/demo_avatar.png");
    }

    #[test]
    fn test_gravatar_ignores_email_case() {
        let config = AvatarConfig::default();
        let lower = account("normal", "alice@example.com").avatar_url(&config);
        let mixed = account("normal", "Alice@Example.COM").avatar_url(&config);
        assert_eq!(lower, mixed);
        assert!(lower.starts_with("https://www.gravatar.com/avatar/"));

        let hash = lower.rsplit('/').next().unwrap();
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_permission_round_trips_through_storage_string() {
        for permission in [Permission::Normal, Permission::Admin, Permission::Demo] {
            assert_eq!(Permission::from_stored(permission.as_str()), permission);
        }
    }
}
