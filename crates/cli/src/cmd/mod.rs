mod add;
mod build;
mod create;
mod version;

pub use add::cmd_add;
pub use build::cmd_build;
pub use create::{CreateArgs, cmd_create};
pub use version::cmd_version;
