//! Notification Records

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use jiff::Timestamp;
use thiserror::Error;

use crate::{domain::orgs::records::OrgUuid, uuids::TypedUuid};

/// Notification UUID
pub type NotificationUuid = TypedUuid<NotificationRecord>;

/// Delivery status of an outbox notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationStatus {
    /// Awaiting pickup by the delivery pipeline.
    Pending,

    /// Delivered.
    Sent,

    /// Delivery attempts exhausted; eligible for replay.
    Failed,

    /// Mid-retry in the delivery pipeline.
    Retrying,
}

impl NotificationStatus {
    /// Every known status, in reporting order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::Sent, Self::Failed, Self::Retrying];

    /// Wire and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Sent => "SENT",
            Self::Failed => "FAILED",
            Self::Retrying => "RETRYING",
        }
    }

    /// Whether the delivery pipeline may still pick this record up.
    #[must_use]
    pub const fn is_deliverable(self) -> bool {
        matches!(self, Self::Pending | Self::Retrying)
    }
}

impl Display for NotificationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Unknown status text encountered while decoding a record.
#[derive(Debug, Error)]
#[error("unknown notification status: {0}")]
pub struct ParseNotificationStatusError(pub String);

impl FromStr for NotificationStatus {
    type Err = ParseNotificationStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PENDING" => Ok(Self::Pending),
            "SENT" => Ok(Self::Sent),
            "FAILED" => Ok(Self::Failed),
            "RETRYING" => Ok(Self::Retrying),
            other => Err(ParseNotificationStatusError(other.to_string())),
        }
    }
}

/// Notification Record
#[derive(Debug, Clone)]
pub struct NotificationRecord {
    /// Unique notification identifier.
    pub uuid: NotificationUuid,

    /// Owning organization; never changes after creation.
    pub org: OrgUuid,

    /// Action the notification describes. Opaque to the outbox.
    pub action: String,

    /// Delivery target description. Opaque to the outbox.
    pub target: String,

    /// Current delivery status.
    pub status: NotificationStatus,

    /// Number of delivery attempts so far.
    pub attempts: u32,

    /// Diagnostic from the most recent failed delivery.
    pub last_error: Option<String>,

    /// Creation timestamp. Immutable.
    pub created_at: Timestamp,

    /// Last update timestamp.
    pub updated_at: Timestamp,
}

/// Per-organization record counts grouped by delivery status.
///
/// Every status is always populated; absent groups count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: u64,
    pub sent: u64,
    pub failed: u64,
    pub retrying: u64,
}

impl StatusCounts {
    pub(crate) const fn add(&mut self, status: NotificationStatus, count: u64) {
        match status {
            NotificationStatus::Pending => self.pending += count,
            NotificationStatus::Sent => self.sent += count,
            NotificationStatus::Failed => self.failed += count,
            NotificationStatus::Retrying => self.retrying += count,
        }
    }

    /// Count for a single status.
    #[must_use]
    pub const fn get(self, status: NotificationStatus) -> u64 {
        match status {
            NotificationStatus::Pending => self.pending,
            NotificationStatus::Sent => self.sent,
            NotificationStatus::Failed => self.failed,
            NotificationStatus::Retrying => self.retrying,
        }
    }
}
