use chrono::{DateTime, Utc};
use serde::Serialize;

/// One entry of a build target's log.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub label: String,
    pub payload: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}
