//! Per-account audit trail
//!
//! Every state change on an account (opening, owner and name changes,
//! access, closure) is recorded as an [`AuditEvent`] in the account's own
//! [`AuditLog`]. The log is persisted inside the account file and can only
//! grow.
//!
//! # Example
//!
//! ```rust,ignore
//! use bank_ledger::audit::{AuditEvent, AuditLog};
//!
//! let mut log = AuditLog::new();
//! log.append(AuditEvent::creation(owner_id));
//! log.append(AuditEvent::access(owner_id));
//! assert_eq!(log.last_access().map(|e| e.actor()), Some(owner_id));
//! ```

mod event;
mod log;

pub use event::{AuditEvent, AuditEventKind};
pub use log::AuditLog;
