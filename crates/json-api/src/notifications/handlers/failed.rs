//! Failed Notifications Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use brigade_app::domain::notifications::records::NotificationRecord;

use crate::{extensions::*, notifications::errors::into_status_error, state::State};

/// Notification Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct NotificationResponse {
    /// The unique identifier of the notification
    pub uuid: Uuid,

    /// The action the notification describes
    pub action: String,

    /// The delivery target description
    pub target: String,

    /// Current delivery status
    pub status: String,

    /// Number of delivery attempts so far
    pub attempts: u32,

    /// Diagnostic from the most recent failed delivery
    pub last_error: Option<String>,

    /// The date and time the notification was created
    pub created_at: String,

    /// The date and time the notification was last updated
    pub updated_at: String,
}

impl From<NotificationRecord> for NotificationResponse {
    fn from(record: NotificationRecord) -> Self {
        Self {
            uuid: record.uuid.into_uuid(),
            action: record.action,
            target: record.target,
            status: record.status.as_str().to_string(),
            attempts: record.attempts,
            last_error: record.last_error,
            created_at: record.created_at.to_string(),
            updated_at: record.updated_at.to_string(),
        }
    }
}

/// Failed Notifications Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct FailedNotificationsResponse {
    /// The list of failed notifications, newest first
    pub notifications: Vec<NotificationResponse>,
}

/// Failed Notifications Handler
///
/// Returns the organization's dead-lettered notifications.
#[endpoint(
    tags("notifications"),
    summary = "List Failed Notifications",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    limit: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<FailedNotificationsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let org = depot.org_uuid_or_401()?;

    let notifications = state
        .app
        .notifications
        .list_failed(org, limit.into_inner())
        .await
        .map_err(into_status_error)?;

    Ok(Json(FailedNotificationsResponse {
        notifications: notifications.into_iter().map(Into::into).collect(),
    }))
}
