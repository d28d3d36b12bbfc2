//! Subcommand implementations, one module per area.

pub mod auth;
pub mod completions;
pub mod history;
pub mod shell;
pub mod users;

pub use auth::{
    run_forgot_password, run_login, run_logout, run_register, run_reset_password,
};
pub use completions::generate_completions;
pub use history::run_history;
pub use shell::run_shell;
pub use users::{run_bulk, run_delete_unverified, run_users};
