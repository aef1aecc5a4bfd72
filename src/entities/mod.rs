pub mod prelude;

pub mod saved_searches;
pub mod users;
