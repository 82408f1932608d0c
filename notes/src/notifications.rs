use chrono::{DateTime, Local};
use notes_api::pipeline::Notifier;
use std::collections::VecDeque;
use std::fmt::Display;
use std::sync::Mutex;

const MAX_TOASTS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Error,
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Info => f.write_str("info"),
            Level::Success => f.write_str("ok"),
            Level::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub level: Level,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Local>,
}

impl Display for Toast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} {}: {}",
            self.created_at.format("%H:%M:%S"),
            self.level,
            self.title,
            self.message
        )
    }
}

/// Toasts waiting to be shown. Oldest entries are dropped once the queue
/// is full.
#[derive(Default)]
pub struct Notifications {
    queue: Mutex<VecDeque<Toast>>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, level: Level, title: &str, message: &str) {
        match level {
            Level::Error => tracing::warn!(title, message, "Toast"),
            _ => tracing::info!(title, message, "Toast"),
        }

        let mut queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
        if queue.len() == MAX_TOASTS {
            queue.pop_front();
        }
        queue.push_back(Toast {
            level,
            title: title.to_string(),
            message: message.to_string(),
            created_at: Local::now(),
        });
    }

    pub fn success(&self, title: &str, message: &str) {
        self.push(Level::Success, title, message);
    }

    pub fn info(&self, title: &str, message: &str) {
        self.push(Level::Info, title, message);
    }

    /// Take every pending toast, oldest first.
    pub fn drain(&self) -> Vec<Toast> {
        self.queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .drain(..)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for Notifications {
    fn error(&self, title: &str, message: &str) {
        self.push(Level::Error, title, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_returns_toasts_in_order() {
        let notifications = Notifications::new();
        notifications.success("Saved", "Note created");
        notifications.error("Error", "Resource not found.");

        let toasts = notifications.drain();
        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts[0].level, Level::Success);
        assert_eq!(toasts[1].title, "Error");
        assert_eq!(toasts[1].message, "Resource not found.");
        assert!(notifications.is_empty());
    }

    #[test]
    fn test_queue_is_bounded() {
        let notifications = Notifications::new();
        for i in 0..MAX_TOASTS + 5 {
            notifications.info("n", &i.to_string());
        }

        let toasts = notifications.drain();
        assert_eq!(toasts.len(), MAX_TOASTS);
        assert_eq!(toasts[0].message, "5");
    }
}
