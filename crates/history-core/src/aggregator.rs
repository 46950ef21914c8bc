//! Per-file session aggregation
//!
//! Project, cwd and branch are fixed by the first event seen for a session in
//! the pass. `last_ts` follows file order (last write wins), and the count is
//! the number of kept events, not the number of messages that end up new in
//! the store.

use std::collections::BTreeMap;

use crate::types::{EventRecord, SessionSummary};

/// Accumulates session summaries while scanning one file
#[derive(Debug, Default)]
pub struct SessionAggregator {
    sessions: BTreeMap<String, SessionSummary>,
}

impl SessionAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one kept event
    pub fn observe(&mut self, event: &EventRecord) {
        let summary = self
            .sessions
            .entry(event.session_id.clone())
            .or_insert_with(|| SessionSummary {
                session_id: event.session_id.clone(),
                project: event.cwd.clone(),
                cwd: event.cwd.clone(),
                git_branch: event.git_branch.clone(),
                first_ts: event.timestamp.clone(),
                last_ts: event.timestamp.clone(),
                message_count: 0,
            });

        summary.last_ts = event.timestamp.clone();
        summary.message_count += 1;
    }

    pub fn get(&self, session_id: &str) -> Option<&SessionSummary> {
        self.sessions.get(session_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Summaries ordered by session ID
    pub fn into_summaries(self) -> Vec<SessionSummary> {
        self.sessions.into_values().collect()
    }
}

impl<'a> FromIterator<&'a EventRecord> for SessionAggregator {
    fn from_iter<I: IntoIterator<Item = &'a EventRecord>>(iter: I) -> Self {
        let mut aggregator = SessionAggregator::new();
        for event in iter {
            aggregator.observe(event);
        }
        aggregator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventType;

    fn event(session_id: &str, ts: &str, cwd: &str, branch: &str) -> EventRecord {
        EventRecord {
            event_type: EventType::User,
            session_id: session_id.into(),
            uuid: format!("{session_id}-{ts}"),
            parent_uuid: None,
            timestamp: ts.into(),
            cwd: cwd.into(),
            git_branch: branch.into(),
            message: None,
        }
    }

    #[test]
    fn test_two_events_one_session() {
        let events = vec![
            event("S2", "2024-01-01T00:00:00Z", "/a", "main"),
            event("S2", "2024-01-01T00:05:00Z", "/a", "main"),
        ];
        let agg: SessionAggregator = events.iter().collect();

        let s = agg.get("S2").unwrap();
        assert_eq!(s.first_ts, "2024-01-01T00:00:00Z");
        assert_eq!(s.last_ts, "2024-01-01T00:05:00Z");
        assert_eq!(s.message_count, 2);
    }

    #[test]
    fn test_location_fixed_at_first_sight() {
        let events = vec![
            event("S1", "t1", "/first", "main"),
            event("S1", "t2", "/second", "feature"),
        ];
        let agg: SessionAggregator = events.iter().collect();

        let s = agg.get("S1").unwrap();
        assert_eq!(s.project, "/first");
        assert_eq!(s.cwd, "/first");
        assert_eq!(s.git_branch, "main");
    }

    #[test]
    fn test_last_ts_follows_file_order() {
        let events = vec![
            event("S1", "2024-01-01T00:00:02Z", "/a", ""),
            event("S1", "2024-01-01T00:00:03Z", "/a", ""),
            event("S1", "2024-01-01T00:00:01Z", "/a", ""),
        ];
        let agg: SessionAggregator = events.iter().collect();
        let s = agg.get("S1").unwrap();
        assert_eq!(s.last_ts, "2024-01-01T00:00:01Z");

        // An out-of-order file leaves first_ts after last_ts
        assert_eq!(s.first_ts, "2024-01-01T00:00:02Z");
        assert!(s.first_ts > s.last_ts);
    }

    #[test]
    fn test_multiple_sessions() {
        let events = vec![
            event("b", "t1", "/b", ""),
            event("a", "t2", "/a", ""),
            event("b", "t3", "/b", ""),
        ];
        let agg: SessionAggregator = events.iter().collect();
        assert_eq!(agg.len(), 2);

        let summaries = agg.into_summaries();
        assert_eq!(summaries[0].session_id, "a");
        assert_eq!(summaries[0].message_count, 1);
        assert_eq!(summaries[1].session_id, "b");
        assert_eq!(summaries[1].message_count, 2);
    }
}
