//! Audit event data structures
//!
//! Defines the kinds of actions recorded against an account and the event
//! record itself. Events have no setters; once built they only move.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{timestamp_now, UserId};

/// Types of actions that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditEventKind {
    /// Account was opened
    Creation,
    /// Owners or name changed
    Modification,
    /// Account details were viewed
    Access,
    /// Account was closed
    Closure,
}

impl std::fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditEventKind::Creation => write!(f, "CREATION"),
            AuditEventKind::Modification => write!(f, "MODIFICATION"),
            AuditEventKind::Access => write!(f, "ACCESS"),
            AuditEventKind::Closure => write!(f, "CLOSURE"),
        }
    }
}

/// A single entry in an account's audit log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    #[serde(rename = "type")]
    kind: AuditEventKind,

    /// Who performed the action
    #[serde(rename = "user")]
    actor: UserId,

    /// When it happened, persisted as epoch seconds
    #[serde(rename = "date_time", with = "chrono::serde::ts_seconds")]
    timestamp: DateTime<Utc>,

    /// Structured note, e.g. `owner_added=<user id>`
    #[serde(rename = "message", default, skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl AuditEvent {
    pub fn new(
        kind: AuditEventKind,
        actor: UserId,
        timestamp: DateTime<Utc>,
        detail: Option<String>,
    ) -> Self {
        Self {
            kind,
            actor,
            timestamp,
            detail,
        }
    }

    pub fn creation(actor: UserId) -> Self {
        Self::new(AuditEventKind::Creation, actor, timestamp_now(), None)
    }

    pub fn modification(actor: UserId, detail: impl Into<String>) -> Self {
        Self::new(
            AuditEventKind::Modification,
            actor,
            timestamp_now(),
            Some(detail.into()),
        )
    }

    pub fn access(actor: UserId) -> Self {
        Self::new(AuditEventKind::Access, actor, timestamp_now(), None)
    }

    pub fn closure(actor: UserId) -> Self {
        Self::new(AuditEventKind::Closure, actor, timestamp_now(), None)
    }

    pub fn kind(&self) -> AuditEventKind {
        self.kind
    }

    pub fn actor(&self) -> UserId {
        self.actor
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display() {
        assert_eq!(AuditEventKind::Creation.to_string(), "CREATION");
        assert_eq!(AuditEventKind::Closure.to_string(), "CLOSURE");
    }

    #[test]
    fn test_modification_carries_detail() {
        let user = UserId::new();
        let event = AuditEvent::modification(user, "renamed=Holiday fund");
        assert_eq!(event.kind(), AuditEventKind::Modification);
        assert_eq!(event.actor(), user);
        assert_eq!(event.detail(), Some("renamed=Holiday fund"));
    }

    #[test]
    fn test_persisted_shape() {
        let user = UserId::new();
        let when = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let event = AuditEvent::new(AuditEventKind::Access, user, when, None);

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "ACCESS");
        assert_eq!(value["user"], user.to_string());
        assert_eq!(value["date_time"], 1_700_000_000);
        assert!(value.get("message").is_none());

        let back: AuditEvent = serde_json::from_value(value).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_message_round_trip() {
        let event = AuditEvent::modification(UserId::new(), "owner_added=x");
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"message\":\"owner_added=x\""));
        let back: AuditEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
