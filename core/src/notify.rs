// Transient user notifications
//
// Every failed or noteworthy operation reports here instead of propagating;
// the server streams notices to connected dashboard clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Notification fan-out for dashboard clients.
#[derive(Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notice>,
}

impl Notifier {
    /// Create a new notifier with buffer size
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.emit(NoticeLevel::Info, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(NoticeLevel::Error, message.into());
    }

    fn emit(&self, level: NoticeLevel, message: String) {
        tracing::debug!(target: "notify", level = ?level, message = %message, "Notice");
        // Ignore error if no subscribers
        let _ = self.sender.send(Notice {
            level,
            message,
            at: Utc::now(),
        });
    }

    /// Subscribe to notices
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }

    /// Get number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_notice_reaches_subscriber() {
        let notifier = Notifier::new(8);
        let mut rx = notifier.subscribe();

        notifier.error("failed to save settings");

        let notice = rx.recv().await.unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "failed to save settings");
    }

    #[test]
    fn test_emit_without_subscribers_is_fine() {
        let notifier = Notifier::new(8);
        notifier.info("nobody is listening");
        assert_eq!(notifier.subscriber_count(), 0);
    }
}
