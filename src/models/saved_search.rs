use serde::{Deserialize, Serialize};

use crate::entities::saved_searches;
use crate::models::time_period::FieldError;

/// Filters a saved search applies to the commit list. Each list field holds
/// comma separated values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub repos: Option<String>,
    pub branches: Option<String>,
    pub authors: Option<String>,
    pub paths: Option<String>,
    pub messages: Option<String>,
    pub unapproved_only: bool,
}

impl SearchOptions {
    #[must_use]
    pub fn for_repo(repo: &str) -> Self {
        Self {
            repos: Some(repo.to_string()),
            ..Self::default()
        }
    }
}

/// A saved search owned by exactly one account.
///
/// The same value is returned by both backends and is the exact shape kept in
/// a demo account's session list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSearch {
    pub id: i32,
    pub user_id: i32,
    pub user_order: i32,
    #[serde(flatten)]
    pub options: SearchOptions,
    pub time_period: Option<i32>,
}

impl From<saved_searches::Model> for SavedSearch {
    fn from(model: saved_searches::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            user_order: model.user_order,
            options: SearchOptions {
                repos: model.repos,
                branches: model.branches,
                authors: model.authors,
                paths: model.paths,
                messages: model.messages,
                unapproved_only: model.unapproved_only,
            },
            time_period: model.time_period,
        }
    }
}

impl SavedSearch {
    /// Short description used in listings, e.g. "Commits by alice in barkeep".
    #[must_use]
    pub fn title(&self) -> String {
        let opts = &self.options;
        let mut parts = Vec::new();

        if let Some(authors) = non_empty(opts.authors.as_deref()) {
            parts.push(format!("by {authors}"));
        }
        if let Some(repos) = non_empty(opts.repos.as_deref()) {
            parts.push(format!("in {repos}"));
        }
        if let Some(branches) = non_empty(opts.branches.as_deref()) {
            parts.push(format!("on {branches}"));
        }
        if let Some(paths) = non_empty(opts.paths.as_deref()) {
            parts.push(format!("touching {paths}"));
        }
        if let Some(messages) = non_empty(opts.messages.as_deref()) {
            parts.push(format!("matching \"{messages}\""));
        }

        let noun = if opts.unapproved_only {
            "Unapproved commits"
        } else {
            "Commits"
        };

        if parts.is_empty() {
            if opts.unapproved_only {
                noun.to_string()
            } else {
                "All commits".to_string()
            }
        } else {
            format!("{noun} {}", parts.join(" "))
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Creation input. A missing `user_order` places the search above all others.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSavedSearch {
    #[serde(flatten)]
    pub options: SearchOptions,
    #[serde(default)]
    pub user_order: Option<i32>,
    #[serde(default)]
    pub time_period: Option<i32>,
}

impl From<SearchOptions> for NewSavedSearch {
    fn from(options: SearchOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }
}

/// Rank for a new entry: one above the current maximum, or 0 for an empty list.
///
/// # Errors
///
/// Fails when the current maximum is already `i32::MAX`.
pub fn next_user_order(existing: impl IntoIterator<Item = i32>) -> Result<i32, FieldError> {
    match existing.into_iter().max() {
        None => Ok(0),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| FieldError::out_of_range("user_order")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_user_order() {
        assert_eq!(next_user_order(Vec::new()), Ok(0));
        assert_eq!(next_user_order([0]), Ok(1));
        assert_eq!(next_user_order([3, 7, 1]), Ok(8));
        assert_eq!(next_user_order([-4]), Ok(-3));
    }

    #[test]
    fn test_next_user_order_at_max_rank_is_an_error() {
        let err = next_user_order([1, i32::MAX]).unwrap_err();
        assert_eq!(err.field, "user_order");
        assert_eq!(next_user_order([i32::MAX - 1]), Ok(i32::MAX));
    }

    #[test]
    fn test_title_lists_filters() {
        let search = SavedSearch {
            id: 1,
            user_id: 1,
            user_order: 0,
            options: SearchOptions {
                repos: Some("barkeep".to_string()),
                authors: Some("alice".to_string()),
                ..SearchOptions::default()
            },
            time_period: None,
        };
        assert_eq!(search.title(), "Commits by alice in barkeep");
    }

    #[test]
    fn test_title_without_filters() {
        let mut search = SavedSearch {
            id: 1,
            user_id: 1,
            user_order: 0,
            options: SearchOptions {
                repos: Some("  ".to_string()),
                ..SearchOptions::default()
            },
            time_period: None,
        };
        assert_eq!(search.title(), "All commits");

        search.options.unapproved_only = true;
        assert_eq!(search.title(), "Unapproved commits");
    }

    #[test]
    fn test_session_shape_is_flat() {
        let search = SavedSearch {
            id: 2,
            user_id: 9,
            user_order: 1,
            options: SearchOptions::for_repo("barkeep"),
            time_period: Some(7),
        };
        let value = serde_json::to_value(&search).unwrap();
        assert_eq!(value["id"], 2);
        assert_eq!(value["repos"], "barkeep");
        assert_eq!(value["unapproved_only"], false);
    }
}
