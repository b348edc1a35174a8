//! Bulk Replay Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    notifications::{errors::into_status_error, replay::ReplayOutcomeResponse},
    state::State,
};

/// Bulk Replay Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReplayBulkRequest {
    /// Notifications to replay, in order
    pub notification_uuids: Vec<Uuid>,
}

/// Bulk Replay Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReplayBulkResponse {
    /// One outcome per requested notification, in request order
    pub results: Vec<ReplayOutcomeResponse>,
}

/// Bulk Replay Handler
///
/// Re-queues a batch of dead-lettered notifications. The call succeeds even
/// when individual items fail; each result entry carries its own outcome.
#[endpoint(
    tags("notifications"),
    summary = "Replay Notifications",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Batch processed; see per-item results"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ReplayBulkRequest>,
    depot: &mut Depot,
) -> Result<Json<ReplayBulkResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let org = depot.org_uuid_or_401()?;
    let actor = depot.actor_uuid_or_401()?;

    let notifications = json
        .into_inner()
        .notification_uuids
        .into_iter()
        .map(Into::into)
        .collect();

    let outcomes = state
        .app
        .notifications
        .replay_many(org, notifications, actor)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ReplayBulkResponse {
        results: outcomes.into_iter().map(Into::into).collect(),
    }))
}
