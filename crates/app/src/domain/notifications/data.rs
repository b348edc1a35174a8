//! Notification Data

use crate::domain::notifications::{
    errors::NotificationsServiceError,
    records::{NotificationRecord, NotificationStatus, NotificationUuid},
};

/// New Notification Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    /// UUID to assign to the notification row.
    pub uuid: NotificationUuid,

    /// Action the notification describes.
    pub action: String,

    /// Delivery target description.
    pub target: String,
}

/// Result of one replay attempt, as reported inside a bulk batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayOutcome {
    /// Notification the outcome refers to.
    pub uuid: NotificationUuid,

    /// Whether the replay succeeded.
    pub success: bool,

    /// Status after the attempt.
    pub new_status: NotificationStatus,

    /// Attempt count after the attempt.
    pub attempts: u32,

    /// Failure detail when `success` is false.
    pub error: Option<String>,
}

impl ReplayOutcome {
    pub(crate) fn replayed(record: &NotificationRecord) -> Self {
        Self {
            uuid: record.uuid,
            success: true,
            new_status: record.status,
            attempts: record.attempts,
            error: None,
        }
    }

    pub(crate) fn rejected(uuid: NotificationUuid, error: &NotificationsServiceError) -> Self {
        Self {
            uuid,
            success: false,
            new_status: NotificationStatus::Failed,
            attempts: 0,
            error: Some(error.to_string()),
        }
    }
}
