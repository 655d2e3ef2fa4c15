// Console state management.
// Activity log shown on the Console tab: fetch progress, cache actions,
// and errors from the analysis pipeline.

use chrono::{DateTime, Utc};
use ratatui::widgets::ListState;

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

/// Console tab state: message list plus unread-error badge count.
#[derive(Debug, Default)]
pub struct ConsoleState {
    pub messages: Vec<ConsoleMessage>,
    pub list_state: ListState,
    /// Errors logged since the console was last viewed.
    pub unread_errors: usize,
}

impl ConsoleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_info(&mut self, message: impl Into<String>) {
        self.messages.push(ConsoleMessage::info(message));
        self.scroll_to_bottom();
    }

    pub fn log_warn(&mut self, message: impl Into<String>) {
        self.messages.push(ConsoleMessage::warn(message));
        self.scroll_to_bottom();
    }

    pub fn log_error(&mut self, message: impl Into<String>) {
        self.messages.push(ConsoleMessage::error(message));
        self.unread_errors += 1;
        self.scroll_to_bottom();
    }

    /// Clear the unread badge (called when the tab becomes visible).
    pub fn mark_read(&mut self) {
        self.unread_errors = 0;
    }

    fn scroll_to_bottom(&mut self) {
        if !self.messages.is_empty() {
            self.list_state.select(Some(self.messages.len() - 1));
        }
    }

    /// Select previous message in list.
    pub fn select_prev(&mut self) {
        if self.messages.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i > 0 => i - 1,
            Some(_) => 0,
            None => self.messages.len().saturating_sub(1),
        };
        self.list_state.select(Some(i));
    }

    /// Select next message in list.
    pub fn select_next(&mut self) {
        if self.messages.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i >= self.messages.len() - 1 => i,
            Some(i) => i + 1,
            None => 0,
        };
        self.list_state.select(Some(i));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_increment_unread_badge() {
        let mut console = ConsoleState::new();
        console.log_info("fetching");
        console.log_error("boom");
        console.log_error("boom again");

        assert_eq!(console.unread_errors, 2);
        console.mark_read();
        assert_eq!(console.unread_errors, 0);
        assert_eq!(console.messages.len(), 3);
    }

    #[test]
    fn test_logging_follows_tail() {
        let mut console = ConsoleState::new();
        console.log_info("one");
        console.log_info("two");
        assert_eq!(console.list_state.selected(), Some(1));
    }
}
