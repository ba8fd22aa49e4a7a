mod init;
mod user;

pub use init::cmd_init;
pub use user::{cmd_create_user, cmd_unlock_user};
