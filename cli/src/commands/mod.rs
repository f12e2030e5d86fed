//! Command implementations for the kong-admin CLI.

pub mod users;

pub use users::{ReportedError, UsersArgs, run_users};
