//! Lookup of the repositories an install knows about.

use std::collections::HashSet;

use crate::config::ReposConfig;

/// Answers whether a repository with a given name is tracked.
pub trait RepoRegistry: Send + Sync {
    fn contains(&self, name: &str) -> bool;
}

/// Registry backed by the `[repos]` section of the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredRepos {
    names: HashSet<String>,
}

impl ConfiguredRepos {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&ReposConfig> for ConfiguredRepos {
    fn from(config: &ReposConfig) -> Self {
        Self::new(config.names.iter().cloned())
    }
}

impl RepoRegistry for ConfiguredRepos {
    fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_matches_exact_names() {
        let repos = ConfiguredRepos::new(["barkeep", "linux"]);
        assert!(repos.contains("barkeep"));
        assert!(!repos.contains("Barkeep"));
        assert!(!ConfiguredRepos::default().contains("barkeep"));
    }
}
