//! Display formatting for terminal output
//!
//! Plain-text tables and detail views for accounts, audit trails and users.

pub mod account;
pub mod user;

pub use account::{format_account_details, format_account_list, format_audit_log};
pub use user::format_user_list;
