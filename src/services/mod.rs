//! Service layer for the bank ledger
//!
//! The service layer provides business rules on top of the storage layer:
//! ownership checks, account limits, transfers and user management.

pub mod account;
pub mod transfer;
pub mod user;

pub use account::AccountService;
pub use transfer::TransferService;
pub use user::UserService;
