//! Bounded in-session log aggregation.
//!
//! Two independent ring buffers record pipeline and dispatcher activity for
//! display alongside the conversation. This is user-facing session state,
//! not a tracing backend: entries are bounded, newest-first, and vanish with
//! the session.

use std::collections::VecDeque;

use chrono::Local;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum LogLevel {
    #[strum(serialize = "INFO")]
    Info,
    #[strum(serialize = "WARN")]
    Warn,
    #[strum(serialize = "ERR")]
    Err,
}

/// The two independent log channels of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum LogChannel {
    /// Metrics acquisition activity.
    #[strum(serialize = "pipeline")]
    Pipeline,
    /// Conversation dispatch activity.
    #[strum(serialize = "dispatcher")]
    Dispatcher,
}

/// A single timestamped log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Wall-clock time of insertion, formatted `%H:%M:%S`.
    pub time: String,
    /// Severity.
    pub level: LogLevel,
    /// Human-readable message.
    pub message: String,
}

/// Bounded, newest-first log buffers keyed by channel.
///
/// Each channel holds at most `capacity` entries; appending beyond that
/// drops the oldest entry from the tail. There is no deduplication and no
/// merging across channels.
#[derive(Debug)]
pub struct LogBook {
    pipeline: VecDeque<LogEntry>,
    dispatcher: VecDeque<LogEntry>,
    capacity: usize,
}

impl LogBook {
    /// Creates a log book with the given per-channel capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            pipeline: VecDeque::with_capacity(capacity),
            dispatcher: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends an entry to the named channel, stamped with the current
    /// local time. The newest entry is always at the front.
    pub fn append(&mut self, channel: LogChannel, level: LogLevel, message: impl Into<String>) {
        let entry = LogEntry {
            time: Local::now().format("%H:%M:%S").to_string(),
            level,
            message: message.into(),
        };

        let capacity = self.capacity;
        let buffer = match channel {
            LogChannel::Pipeline => &mut self.pipeline,
            LogChannel::Dispatcher => &mut self.dispatcher,
        };
        buffer.push_front(entry);
        buffer.truncate(capacity);
    }

    /// Returns the entries of a channel, newest first.
    pub fn entries(&self, channel: LogChannel) -> impl Iterator<Item = &LogEntry> {
        self.buffer(channel).iter()
    }

    /// Number of entries currently held in a channel.
    pub fn len(&self, channel: LogChannel) -> usize {
        self.buffer(channel).len()
    }

    pub fn is_empty(&self, channel: LogChannel) -> bool {
        self.buffer(channel).is_empty()
    }

    fn buffer(&self, channel: LogChannel) -> &VecDeque<LogEntry> {
        match channel {
            LogChannel::Pipeline => &self.pipeline,
            LogChannel::Dispatcher => &self.dispatcher,
        }
    }
}

impl Default for LogBook {
    fn default() -> Self {
        Self::new(50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_is_newest_first() {
        let mut book = LogBook::new(50);
        book.append(LogChannel::Pipeline, LogLevel::Info, "first");
        book.append(LogChannel::Pipeline, LogLevel::Warn, "second");

        let messages: Vec<_> = book
            .entries(LogChannel::Pipeline)
            .map(|e| e.message.as_str())
            .collect();
        assert_eq!(messages, vec!["second", "first"]);
    }

    #[test]
    fn test_channels_are_independent() {
        let mut book = LogBook::new(50);
        book.append(LogChannel::Pipeline, LogLevel::Info, "poll ok");

        assert_eq!(book.len(LogChannel::Pipeline), 1);
        assert!(book.is_empty(LogChannel::Dispatcher));
    }

    #[test]
    fn test_overflow_drops_oldest() {
        let mut book = LogBook::new(50);
        for i in 0..75 {
            book.append(LogChannel::Dispatcher, LogLevel::Info, format!("entry {i}"));
        }

        assert_eq!(book.len(LogChannel::Dispatcher), 50);

        let messages: Vec<_> = book
            .entries(LogChannel::Dispatcher)
            .map(|e| e.message.as_str())
            .collect();
        // Newest entry at the front, oldest surviving entry at the back
        assert_eq!(messages[0], "entry 74");
        assert_eq!(messages[49], "entry 25");
    }

    #[test]
    fn test_level_display() {
        assert_eq!(LogLevel::Info.to_string(), "INFO");
        assert_eq!(LogLevel::Warn.to_string(), "WARN");
        assert_eq!(LogLevel::Err.to_string(), "ERR");
    }
}
