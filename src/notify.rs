// Notification sink
// The core reports each logical outcome at most once; how it is shown
// (toast, status line, log) is up to the host.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    // Blank error messages fall back to a generic one
    pub fn new(kind: NotificationKind, message: &str) -> Self {
        let message = if kind == NotificationKind::Error && message.trim().is_empty() {
            DEFAULT_ERROR_MESSAGE.to_string()
        } else {
            message.to_string()
        };
        Self { kind, message }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NotificationKind, message: &str);

    fn success(&self, message: &str) {
        self.notify(NotificationKind::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(NotificationKind::Error, message);
    }

    fn info(&self, message: &str) {
        self.notify(NotificationKind::Info, message);
    }

    fn warning(&self, message: &str) {
        self.notify(NotificationKind::Warning, message);
    }
}

// Emits notifications as tracing events for headless hosts
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        let notification = Notification::new(kind, message);
        match notification.kind {
            NotificationKind::Error => tracing::error!("{}", notification.message),
            NotificationKind::Warning => tracing::warn!("{}", notification.message),
            NotificationKind::Success | NotificationKind::Info => {
                tracing::info!(kind = ?notification.kind, "{}", notification.message)
            }
        }
    }
}

// Keeps every notification in order; used by tests and by hosts that
// render a notification history
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().clone()
    }

    pub fn count(&self, kind: NotificationKind) -> usize {
        self.notifications
            .lock()
            .iter()
            .filter(|n| n.kind == kind)
            .count()
    }

    pub fn last(&self) -> Option<Notification> {
        self.notifications.lock().last().cloned()
    }

    pub fn clear(&self) {
        self.notifications.lock().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        self.notifications
            .lock()
            .push(Notification::new(kind, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_keeps_order_and_kinds() {
        let notifier = RecordingNotifier::new();
        notifier.success("Added to favorites");
        notifier.info("Removed from favorites");
        notifier.error("Failed to update favorite status");

        let all = notifier.notifications();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].kind, NotificationKind::Success);
        assert_eq!(all[2].message, "Failed to update favorite status");
        assert_eq!(notifier.count(NotificationKind::Info), 1);

        notifier.clear();
        assert!(notifier.last().is_none());
    }

    #[test]
    fn test_blank_error_gets_default_message() {
        let notifier = RecordingNotifier::new();
        notifier.error("");
        notifier.warning("");

        let all = notifier.notifications();
        assert_eq!(all[0].message, DEFAULT_ERROR_MESSAGE);
        assert_eq!(all[1].message, "");
    }

    #[test]
    fn test_tracing_notifier_does_not_panic_without_subscriber() {
        let notifier = TracingNotifier;
        notifier.error("boom");
        notifier.success("ok");
    }
}
