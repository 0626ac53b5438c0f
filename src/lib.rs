//! Bank Ledger - single-process banking ledger
//!
//! This library keeps users and accounts in plain JSON files, moves money
//! between accounts with a fee and optional currency conversion, and records
//! an append-only audit trail on every account.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (users, accounts, transactions, money)
//! - `audit`: Per-account audit events
//! - `conversion`: Currency conversion collaborators
//! - `storage`: JSON file storage layer with per-account locking
//! - `auth`: Password hashing and login throttling
//! - `services`: Business logic layer
//! - `cli` / `display`: Command handlers and terminal formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use bank_ledger::auth::Argon2Hasher;
//! use bank_ledger::config::{LedgerPaths, Settings};
//! use bank_ledger::storage::Storage;
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(paths, &settings, &Argon2Hasher::new())?;
//! ```

pub mod audit;
pub mod auth;
pub mod cli;
pub mod config;
pub mod conversion;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
