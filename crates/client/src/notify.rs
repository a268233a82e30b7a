//! Transient user-facing notifications.
//!
//! The orchestrator pushes notices here; the presentation layer drains them
//! on its own schedule. The queue is bounded - if nobody drains, the oldest
//! notices fall off rather than growing without limit.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};

/// Maximum notices retained when nothing drains the queue.
const MAX_NOTICES: usize = 32;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// One user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Ready-to-display message.
    pub message: String,
    /// When the notice was raised.
    pub timestamp: DateTime<Utc>,
}

/// Bounded FIFO of pending notices.
#[derive(Debug, Default)]
pub struct Notifier {
    queue: Mutex<VecDeque<Notice>>,
}

impl Notifier {
    /// Create an empty notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a notice.
    pub fn push(&self, level: NoticeLevel, message: impl Into<String>) {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        if queue.len() == MAX_NOTICES {
            queue.pop_front();
        }
        queue.push_back(Notice {
            level,
            message: message.into(),
            timestamp: Utc::now(),
        });
    }

    /// Push an informational notice.
    pub fn info(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message);
    }

    /// Push a success notice.
    pub fn success(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message);
    }

    /// Push an error notice.
    pub fn error(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message);
    }

    /// Take every pending notice, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<Notice> {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        queue.drain(..).collect()
    }

    /// Number of pending notices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no notices are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_returns_in_order_and_empties() {
        let notifier = Notifier::new();
        notifier.error("first");
        notifier.success("second");

        let notices = notifier.drain();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].message, "first");
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[1].message, "second");
        assert!(notifier.is_empty());
    }

    #[test]
    fn test_queue_is_bounded() {
        let notifier = Notifier::new();
        for i in 0..40 {
            notifier.info(format!("notice {i}"));
        }
        let notices = notifier.drain();
        assert_eq!(notices.len(), MAX_NOTICES);
        // Oldest fell off
        assert_eq!(notices[0].message, "notice 8");
    }
}
