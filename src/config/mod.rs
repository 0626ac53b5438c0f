//! Configuration module for the bank ledger
//!
//! - XDG-compliant path resolution
//! - Settings persistence (fee, rates, limits, policies)

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::Settings;
