// Console tab state.
// Activity log of searches, cache refreshes and errors shown to the user.

use chrono::{DateTime, Utc};
use ratatui::widgets::ListState;

/// Oldest messages are dropped past this count.
pub const MAX_CONSOLE_MESSAGES: usize = 200;

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
        Self::with_level(ConsoleLevel::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::with_level(ConsoleLevel::Warn, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_level(ConsoleLevel::Error, message)
    }

    fn with_level(level: ConsoleLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Console messages plus the unread-error badge count.
#[derive(Debug, Default)]
pub struct ConsoleState {
    pub messages: Vec<ConsoleMessage>,
    pub list_state: ListState,
    /// Errors and warnings pushed while the console tab was not visible.
    pub unread: usize,
}

impl ConsoleState {
    /// Append a message. `visible` is whether the console tab is on screen.
    pub fn push(&mut self, message: ConsoleMessage, visible: bool) {
        if !visible && message.level != ConsoleLevel::Info {
            self.unread += 1;
        }
        self.messages.push(message);
        if self.messages.len() > MAX_CONSOLE_MESSAGES {
            let excess = self.messages.len() - MAX_CONSOLE_MESSAGES;
            self.messages.drain(..excess);
        }
    }

    pub fn mark_read(&mut self) {
        self.unread = 0;
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.list_state.select(None);
        self.unread = 0;
    }

    /// Select the next (older) message; the list is drawn newest first.
    pub fn select_next(&mut self) {
        if self.messages.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.messages.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_prev(&mut self) {
        if self.messages.is_empty() {
            return;
        }
        let i = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.list_state.select(Some(i));
    }
}
