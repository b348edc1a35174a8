//! Replay Notification Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use brigade_app::domain::notifications::data::ReplayOutcome;

use crate::{extensions::*, notifications::errors::into_status_error, state::State};

/// Replay Outcome Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReplayOutcomeResponse {
    /// The notification the outcome refers to
    pub uuid: Uuid,

    /// Whether the replay succeeded
    pub success: bool,

    /// Delivery status after the attempt
    pub new_status: String,

    /// Attempt count after the attempt
    pub attempts: u32,

    /// Failure detail when `success` is false
    pub error: Option<String>,
}

impl From<ReplayOutcome> for ReplayOutcomeResponse {
    fn from(outcome: ReplayOutcome) -> Self {
        Self {
            uuid: outcome.uuid.into_uuid(),
            success: outcome.success,
            new_status: outcome.new_status.as_str().to_string(),
            attempts: outcome.attempts,
            error: outcome.error,
        }
    }
}

/// Replay Notification Handler
///
/// Re-queues one dead-lettered notification for delivery.
#[endpoint(
    tags("notifications"),
    summary = "Replay Notification",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Notification re-queued"),
        (status_code = StatusCode::NOT_FOUND, description = "Notification not found"),
        (status_code = StatusCode::FORBIDDEN, description = "Notification belongs to a different organization"),
        (status_code = StatusCode::CONFLICT, description = "Notification is not in a failed state"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ReplayOutcomeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let org = depot.org_uuid_or_401()?;
    let actor = depot.actor_uuid_or_401()?;

    let outcome = state
        .app
        .notifications
        .replay(org, uuid.into_inner().into(), actor)
        .await
        .map_err(into_status_error)?;

    Ok(Json(outcome.into()))
}
