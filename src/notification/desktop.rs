//! Desktop notification sender backed by the host notification service.

use notify_rust::{Notification, Timeout, Urgency};
use tracing::debug;

use super::error::NotificationError;
use super::{NotificationContent, NotificationSender};

/// How long a notification stays on screen, in milliseconds.
const NOTIFICATION_TIMEOUT_MS: u32 = 10_000;

/// Notification sender using the desktop notification service.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    /// Creates a new desktop notifier.
    pub fn new() -> Self {
        Self
    }
}

impl NotificationSender for DesktopNotifier {
    fn send(&self, content: &NotificationContent) -> Result<(), NotificationError> {
        debug!("Sending notification: {}", content.summary);

        Notification::new()
            .summary(&content.summary)
            .body(&content.body)
            .appname("deskclock")
            .urgency(Urgency::Critical)
            .timeout(Timeout::Milliseconds(NOTIFICATION_TIMEOUT_MS))
            .show()
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?;

        Ok(())
    }
}
