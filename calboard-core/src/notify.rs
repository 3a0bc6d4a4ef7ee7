//! User-facing notifications raised by the board.
//!
//! The board only queues them; showing toasts is up to the caller.

use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Notification {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notification {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Notification {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// FIFO of pending notifications, capped so an unattended board does not
/// grow without bound.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    pending: VecDeque<Notification>,
}

impl NotificationQueue {
    const CAPACITY: usize = 32;

    pub fn push(&mut self, notification: Notification) {
        if self.pending.len() == Self::CAPACITY {
            self.pending.pop_front();
        }
        self.pending.push_back(notification);
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        self.pending.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_drops_oldest_when_full() {
        let mut queue = NotificationQueue::default();
        for n in 0..40 {
            queue.push(Notification::info(format!("n{n}")));
        }

        let drained = queue.drain();
        assert_eq!(drained.len(), NotificationQueue::CAPACITY);
        assert_eq!(drained[0].message, "n8");
        assert!(queue.is_empty());
    }
}
