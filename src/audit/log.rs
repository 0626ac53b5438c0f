//! Append-only audit log
//!
//! The container exposes `append` and read access only. There is no way to
//! replace, reorder or drop an event once it is in the log.

use serde::{Deserialize, Serialize};

use super::event::{AuditEvent, AuditEventKind};

/// Chronological record of everything done to one account.
///
/// Storage order is insertion order; [`AuditLog::newest_first`] gives the
/// display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditLog {
    events: Vec<AuditEvent>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, event: AuditEvent) {
        self.events.push(event);
    }

    /// The most recent event. On equal timestamps the later insertion wins.
    pub fn latest(&self) -> Option<&AuditEvent> {
        self.events.iter().max_by_key(|event| event.timestamp())
    }

    /// The most recent access event
    pub fn last_access(&self) -> Option<&AuditEvent> {
        self.events
            .iter()
            .filter(|event| event.kind() == AuditEventKind::Access)
            .max_by_key(|event| event.timestamp())
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events in storage (insertion) order
    pub fn iter(&self) -> std::slice::Iter<'_, AuditEvent> {
        self.events.iter()
    }

    /// Events latest first; ties keep the later insertion in front
    pub fn newest_first(&self) -> Vec<&AuditEvent> {
        let mut events: Vec<&AuditEvent> = self.events.iter().rev().collect();
        events.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
        events
    }
}

impl<'a> IntoIterator for &'a AuditLog {
    type Item = &'a AuditEvent;
    type IntoIter = std::slice::Iter<'a, AuditEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;
    use chrono::{DateTime, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn event(kind: AuditEventKind, secs: i64) -> AuditEvent {
        AuditEvent::new(kind, UserId::new(), at(secs), None)
    }

    #[test]
    fn test_empty_log() {
        let log = AuditLog::new();
        assert!(log.is_empty());
        assert!(log.latest().is_none());
        assert!(log.last_access().is_none());
    }

    #[test]
    fn test_latest_is_newest_timestamp() {
        let mut log = AuditLog::new();
        log.append(event(AuditEventKind::Creation, 100));
        log.append(event(AuditEventKind::Modification, 300));
        log.append(event(AuditEventKind::Access, 200));

        assert_eq!(log.latest().unwrap().timestamp(), at(300));
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_latest_prefers_later_insertion_on_tie() {
        let mut log = AuditLog::new();
        log.append(event(AuditEventKind::Access, 100));
        log.append(event(AuditEventKind::Closure, 100));

        assert_eq!(log.latest().unwrap().kind(), AuditEventKind::Closure);
    }

    #[test]
    fn test_last_access_ignores_other_kinds() {
        let mut log = AuditLog::new();
        log.append(event(AuditEventKind::Access, 100));
        log.append(event(AuditEventKind::Access, 150));
        log.append(event(AuditEventKind::Modification, 400));

        let access = log.last_access().unwrap();
        assert_eq!(access.kind(), AuditEventKind::Access);
        assert_eq!(access.timestamp(), at(150));
    }

    #[test]
    fn test_newest_first_order() {
        let mut log = AuditLog::new();
        log.append(event(AuditEventKind::Creation, 100));
        log.append(event(AuditEventKind::Access, 300));
        log.append(event(AuditEventKind::Modification, 200));

        let order: Vec<_> = log.newest_first().iter().map(|e| e.timestamp()).collect();
        assert_eq!(order, vec![at(300), at(200), at(100)]);

        // Storage order is untouched
        let stored: Vec<_> = log.iter().map(|e| e.timestamp()).collect();
        assert_eq!(stored, vec![at(100), at(300), at(200)]);
    }

    #[test]
    fn test_serializes_as_array() {
        let mut log = AuditLog::new();
        log.append(event(AuditEventKind::Creation, 100));

        let value = serde_json::to_value(&log).unwrap();
        assert!(value.is_array());

        let back: AuditLog = serde_json::from_value(value).unwrap();
        assert_eq!(back, log);
    }
}
