mod init;
mod searches;
mod user;

pub use init::cmd_init;
pub use searches::cmd_list_searches;
pub use user::cmd_create_user;
