//! Log feed entries

use chrono::Local;
use std::fmt;

/// One line of the visible log feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: String,
    pub message: String,
}

impl LogEntry {
    /// Entry stamped with the local wall clock (`HH:MM:SS`)
    pub fn now(message: impl Into<String>) -> Self {
        Self::at(Local::now().format("%H:%M:%S").to_string(), message)
    }

    /// Entry with an explicit timestamp label
    pub fn at(timestamp: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp, self.message)
    }
}
