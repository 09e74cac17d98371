use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Unix time in seconds.
    pub timestamp: f64,
    pub step: String,
    pub details: Value,
}

/// Ordered step records for a single research request. Owned by whoever runs
/// the request and dropped with it.
#[derive(Debug, Clone, Default)]
pub struct SessionLog {
    session_id: String,
    entries: VecDeque<LogEntry>,
}

impl SessionLog {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            entries: VecDeque::new(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn log_step(&mut self, step: impl Into<String>, details: Value) {
        self.entries.push_back(LogEntry {
            timestamp: unix_seconds(),
            step: step.into(),
            details,
        });
    }

    /// Returns every entry recorded so far and leaves the log empty.
    pub fn drain(&mut self) -> Vec<LogEntry> {
        self.entries.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn unix_seconds() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Session logs addressable by id. Sessions live until [`clear_session`] is
/// called.
///
/// [`clear_session`]: ResearchLogger::clear_session
#[derive(Debug, Default)]
pub struct ResearchLogger {
    sessions: Mutex<HashMap<String, SessionLog>>,
}

impl ResearchLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh session, replacing any existing one with the same id.
    pub fn create_session(&self, session_id: &str) {
        self.lock()
            .insert(session_id.to_string(), SessionLog::new(session_id));
    }

    /// Records a step. Unknown session ids are ignored.
    pub fn log_step(&self, session_id: &str, step: &str, details: Value) {
        if let Some(log) = self.lock().get_mut(session_id) {
            log.log_step(step, details);
        }
    }

    /// Drains the session's queue. Unknown ids yield an empty vector.
    pub fn get_logs(&self, session_id: &str) -> Vec<LogEntry> {
        self.lock()
            .get_mut(session_id)
            .map(SessionLog::drain)
            .unwrap_or_default()
    }

    pub fn clear_session(&self, session_id: &str) {
        self.lock().remove(session_id);
    }

    #[cfg(test)]
    fn session_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, SessionLog>> {
        // A panic while holding the lock cannot leave a queue half-written.
        self.sessions
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn session_log_drains_in_order() {
        let mut log = SessionLog::new("s1");
        log.log_step("search_complete", json!({"count": 2}));
        log.log_step("synthesis_complete", Value::Null);

        let entries = log.drain();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].step, "search_complete");
        assert_eq!(entries[0].details["count"], 2);
        assert_eq!(entries[1].step, "synthesis_complete");
        assert!(entries[0].timestamp <= entries[1].timestamp);
        assert!(log.is_empty());
    }

    #[test]
    fn get_logs_twice_returns_empty_second_time() {
        let logger = ResearchLogger::new();
        logger.create_session("abc");
        logger.log_step("abc", "started", json!("topic"));

        assert_eq!(logger.get_logs("abc").len(), 1);
        assert!(logger.get_logs("abc").is_empty());

        logger.log_step("abc", "again", Value::Null);
        assert_eq!(logger.get_logs("abc")[0].step, "again");
    }

    #[test]
    fn log_step_on_unknown_session_is_noop() {
        let logger = ResearchLogger::new();
        logger.log_step("never-created", "step", Value::Null);
        assert!(logger.get_logs("never-created").is_empty());
        assert_eq!(logger.session_count(), 0);
    }

    #[test]
    fn clear_session_discards_entries() {
        let logger = ResearchLogger::new();
        logger.create_session("abc");
        logger.log_step("abc", "step", Value::Null);
        logger.clear_session("abc");

        assert_eq!(logger.session_count(), 0);
        logger.log_step("abc", "late", Value::Null);
        assert!(logger.get_logs("abc").is_empty());
    }

    #[test]
    fn create_session_resets_existing_queue() {
        let logger = ResearchLogger::new();
        logger.create_session("abc");
        logger.log_step("abc", "old", Value::Null);
        logger.create_session("abc");
        assert!(logger.get_logs("abc").is_empty());
    }
}
