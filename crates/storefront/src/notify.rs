//! User-visible notifications.
//!
//! The state container never renders anything. It publishes
//! [`Notification`]s on a broadcast channel and views decide how to show
//! them (toasts, a status line in the CLI).

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Buffered notifications per subscriber before old ones are dropped.
const CHANNEL_CAPACITY: usize = 64;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    fn new(level: NotificationLevel, message: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            message,
            created_at: Utc::now(),
        }
    }

    /// Whether this is an error notification.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

/// Publishing side of the notification channel.
#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Receive every notification published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn success(&self, message: impl Into<String>) {
        self.publish(Notification::new(NotificationLevel::Success, message.into()));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.publish(Notification::new(NotificationLevel::Error, message.into()));
    }

    fn publish(&self, notification: Notification) {
        tracing::debug!(
            level = ?notification.level,
            message = %notification.message,
            "Notification"
        );
        // No subscribers is fine: nobody is looking at the screen.
        let _ = self.tx.send(notification);
    }
}
