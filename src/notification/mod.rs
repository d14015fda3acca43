//! Desktop notification system.
//!
//! Alarm fire and countdown completion surface as desktop notifications
//! (the non-blocking analog of a modal message box). This module provides:
//!
//! - `NotificationContent` for the two notification kinds
//! - The `NotificationSender` trait
//! - `DesktopNotifier` backed by the host notification service
//! - `MockNotificationSender` for tests

mod desktop;
pub mod error;

pub use self::desktop::DesktopNotifier;
pub use self::error::NotificationError;

use std::sync::Mutex;

// ============================================================================
// NotificationContent
// ============================================================================

/// Content of a single notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    /// Short title line
    pub summary: String,
    /// Body text
    pub body: String,
}

impl NotificationContent {
    /// Builds the notification for a fired alarm.
    pub fn alarm_fired(label: &str, time: &str) -> Self {
        Self {
            summary: "アラーム".to_string(),
            body: format!("{}\n時刻: {}", label, time),
        }
    }

    /// Builds the notification for a finished countdown.
    pub fn countdown_finished() -> Self {
        Self {
            summary: "タイマー".to_string(),
            body: "タイマーが終了しました".to_string(),
        }
    }
}

// ============================================================================
// NotificationSender
// ============================================================================

/// Trait for notification delivery implementations.
///
/// Delivery is fire-and-forget: a failed send is reported to the caller,
/// which logs it and moves on. There is no retry.
pub trait NotificationSender: Send + Sync {
    /// Delivers a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the host notification service rejects the
    /// notification.
    fn send(&self, content: &NotificationContent) -> Result<(), NotificationError>;
}

// ============================================================================
// MockNotificationSender
// ============================================================================

/// A notification sender that records sent notifications, for tests.
#[derive(Debug, Default)]
pub struct MockNotificationSender {
    sent: Mutex<Vec<NotificationContent>>,
    fail: bool,
}

impl MockNotificationSender {
    /// Creates a mock that accepts every notification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock that fails every send.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Returns the notifications sent so far.
    pub fn sent(&self) -> Vec<NotificationContent> {
        self.sent.lock().unwrap().clone()
    }
}

impl NotificationSender for MockNotificationSender {
    fn send(&self, content: &NotificationContent) -> Result<(), NotificationError> {
        if self.fail {
            return Err(NotificationError::SendFailed(
                "mock failure".to_string(),
            ));
        }
        self.sent.lock().unwrap().push(content.clone());
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
