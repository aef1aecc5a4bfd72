pub mod account;
pub mod saved_search;
pub mod time_period;

pub use account::{Account, NewAccount, Permission};
pub use saved_search::{NewSavedSearch, SavedSearch, SearchOptions, next_user_order};
pub use time_period::{FieldError, ONE_YEAR, validate_time_period};
