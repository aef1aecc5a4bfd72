pub use super::saved_searches::Entity as SavedSearches;
pub use super::users::Entity as Users;
