//! LogState - Diagnostic Log Lines with Ring Buffer

use chrono::{DateTime, Local};
use std::collections::VecDeque;

use crate::constants::DEBUG_LOG_CAPACITY;
use crate::utils::format::format_local_datetime;

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

impl LogLevel {
    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// A single log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub id: u64,
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Local>,
}

impl LogEntry {
    /// `[time] LEVEL message`
    pub fn render(&self) -> String {
        format!(
            "[{}] {} {}",
            format_local_datetime(&self.timestamp),
            self.level.label(),
            self.message
        )
    }
}

/// Log lines kept in a fixed-capacity ring buffer; the oldest entry is evicted first
#[derive(Debug, Clone)]
pub struct LogState {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    next_id: u64,
}

impl LogState {
    /// Create a new log state with the specified capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            next_id: 1,
        }
    }

    /// Push a new log entry with the current timestamp
    pub fn push(&mut self, level: LogLevel, message: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        let entry = LogEntry {
            id: self.next_id,
            level,
            message: message.into(),
            timestamp: Local::now(),
        };
        self.next_id += 1;

        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn entries(&self) -> &VecDeque<LogEntry> {
        &self.entries
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for LogState {
    fn default() -> Self {
        Self::new(DEBUG_LOG_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eviction() {
        let mut log = LogState::new(2);
        log.push(LogLevel::Info, "a");
        log.push(LogLevel::Info, "b");
        log.push(LogLevel::Error, "c");
        let messages: Vec<_> = log.entries().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["b", "c"]);
        assert_eq!(log.last().map(|e| e.id), Some(3));
    }

    #[test]
    fn test_zero_capacity() {
        let mut log = LogState::new(0);
        log.push(LogLevel::Info, "dropped");
        assert!(log.is_empty());
    }
}
