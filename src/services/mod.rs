pub mod keys;
pub use keys::{KeyGenerator, RandomKeyGenerator};

pub mod repos;
pub use repos::{ConfiguredRepos, RepoRegistry};

pub mod demo_session;
pub use demo_session::{DemoSession, DemoSessionData};

pub mod saved_search_service;
pub mod saved_search_service_impl;
pub use saved_search_service::{SavedSearchError, SavedSearchStore, saved_search_store_for};
pub use saved_search_service_impl::{DatabaseSavedSearches, SessionSavedSearches};

pub mod account_service;
pub mod account_service_impl;
pub use account_service::{AccountError, AccountService};
pub use account_service_impl::SeaOrmAccountService;
