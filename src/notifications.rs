//! Transient in-app notifications shown in the status bar

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Oldest notifications are dropped past this many
const MAX_QUEUED: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: Level,
    pub created: Instant,
}

#[derive(Debug)]
pub struct Notifications {
    queue: VecDeque<Notification>,
    ttl: Duration,
}

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Self {
            queue: VecDeque::new(),
            ttl,
        }
    }

    pub fn push_info(&mut self, message: impl Into<String>) {
        self.push(message.into(), Level::Info);
    }

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.push(message.into(), Level::Error);
    }

    fn push(&mut self, message: String, level: Level) {
        if self.queue.len() == MAX_QUEUED {
            self.queue.pop_front();
        }
        self.queue.push_back(Notification {
            message,
            level,
            created: Instant::now(),
        });
    }

    /// Most recent notification still on screen
    pub fn latest(&self) -> Option<&Notification> {
        self.queue.back()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Dismiss the latest notification
    pub fn dismiss(&mut self) -> Option<Notification> {
        self.queue.pop_back()
    }

    /// Drop notifications older than the ttl
    pub fn expire(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.queue
            .retain(|n| now.saturating_duration_since(n.created) < ttl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_and_dismiss() {
        let mut notifications = Notifications::new(Duration::from_secs(3));
        notifications.push_info("saved");
        notifications.push_error("could not save tasks");

        let latest = notifications.latest().unwrap();
        assert_eq!(latest.level, Level::Error);
        assert_eq!(latest.message, "could not save tasks");

        notifications.dismiss();
        assert_eq!(notifications.latest().unwrap().message, "saved");
        notifications.dismiss();
        assert!(notifications.is_empty());
        assert!(notifications.dismiss().is_none());
    }

    #[test]
    fn test_expire_drops_old_notifications() {
        let mut notifications = Notifications::new(Duration::from_secs(3));
        notifications.push_info("hello");
        let created = notifications.latest().unwrap().created;

        notifications.expire(created + Duration::from_secs(1));
        assert!(!notifications.is_empty());

        notifications.expire(created + Duration::from_secs(3));
        assert!(notifications.is_empty());
    }

    #[test]
    fn test_queue_is_bounded() {
        let mut notifications = Notifications::new(Duration::from_secs(3));
        for i in 0..20 {
            notifications.push_info(format!("n{}", i));
        }
        assert_eq!(notifications.queue.len(), MAX_QUEUED);
        assert_eq!(notifications.latest().unwrap().message, "n19");
    }
}
