// Console tab state.
// In-app activity log: recoverable failures in the feed and cache land here
// instead of being surfaced as errors.

use chrono::{DateTime, Utc};

/// Console message level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Info,
    Warn,
    Error,
}

/// A console message for the activity log.
#[derive(Debug, Clone)]
pub struct ConsoleMessage {
    pub level: ConsoleLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ConsoleMessage {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: ConsoleLevel::Info,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            level: ConsoleLevel::Warn,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ConsoleLevel::Error,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// State for the Console tab.
#[derive(Debug, Default)]
pub struct ConsoleState {
    pub messages: Vec<ConsoleMessage>,
    /// Warnings/errors logged since the tab was last viewed (for the badge).
    pub unread: usize,
}

impl ConsoleState {
    pub fn push(&mut self, message: ConsoleMessage, viewing: bool) {
        if !viewing && message.level != ConsoleLevel::Info {
            self.unread += 1;
        }
        self.messages.push(message);
    }

    pub fn mark_read(&mut self) {
        self.unread = 0;
    }
}
