//! Notification system error types.

use thiserror::Error;

/// Errors that can occur while delivering a notification.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The host notification service rejected the notification.
    #[error("通知の送信に失敗しました: {0}")]
    SendFailed(String),
}
