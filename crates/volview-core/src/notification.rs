//! Transient, auto-dismissing user messages.

use std::time::{Duration, Instant};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// A message shown until it expires.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub expires_at: Instant,
}

/// Queue of live notifications.
#[derive(Debug, Clone)]
pub struct Notifier {
    lifetime: Duration,
    live: Vec<Notification>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(Duration::from_secs(3))
    }
}

impl Notifier {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            live: Vec::new(),
        }
    }

    /// Raises a message that expires one lifetime after `now`.
    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>, now: Instant) {
        let message = message.into();
        match level {
            NotificationLevel::Info => log::info!("{message}"),
            NotificationLevel::Warning | NotificationLevel::Error => log::warn!("{message}"),
        }
        self.live.push(Notification {
            level,
            message,
            expires_at: now + self.lifetime,
        });
    }

    /// Drops expired notifications. Returns how many were removed.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.live.len();
        self.live.retain(|n| n.expires_at > now);
        before - self.live.len()
    }

    /// Live notifications, oldest first.
    pub fn live(&self) -> &[Notification] {
        &self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
