//! Status Counts Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use brigade_app::domain::notifications::records::StatusCounts;

use crate::{extensions::*, notifications::errors::into_status_error, state::State};

/// Status Counts Response
///
/// Every status is always present; absent groups count as zero.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct StatusCountsResponse {
    /// Records awaiting delivery
    #[serde(rename = "PENDING")]
    pub pending: u64,

    /// Delivered records
    #[serde(rename = "SENT")]
    pub sent: u64,

    /// Dead-lettered records
    #[serde(rename = "FAILED")]
    pub failed: u64,

    /// Records mid-retry in the delivery pipeline
    #[serde(rename = "RETRYING")]
    pub retrying: u64,
}

impl From<StatusCounts> for StatusCountsResponse {
    fn from(counts: StatusCounts) -> Self {
        Self {
            pending: counts.pending,
            sent: counts.sent,
            failed: counts.failed,
            retrying: counts.retrying,
        }
    }
}

/// Status Counts Handler
///
/// Returns the organization's notification counts grouped by status.
#[endpoint(
    tags("notifications"),
    summary = "Notification Status Counts",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<StatusCountsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let org = depot.org_uuid_or_401()?;

    let counts = state
        .app
        .notifications
        .counts_by_status(org)
        .await
        .map_err(into_status_error)?;

    Ok(Json(counts.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use brigade_app::domain::notifications::MockNotificationsService;

    use crate::test_helpers::{TEST_ORG_UUID, notifications_service, strict_notifications_mock};

    use super::*;

    fn make_service(repo: MockNotificationsService) -> Service {
        notifications_service(
            repo,
            Router::with_path("notifications/status-counts").get(handler),
        )
    }

    #[tokio::test]
    async fn test_counts_empty_org_returns_all_zero_keys() -> TestResult {
        let mut repo = strict_notifications_mock();

        repo.expect_counts_by_status()
            .once()
            .withf(|org| *org == TEST_ORG_UUID)
            .return_once(|_| Ok(StatusCounts::default()));

        let mut res = TestClient::get("http://example.com/notifications/status-counts")
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: serde_json::Value = res.take_json().await?;

        assert_eq!(
            body,
            serde_json::json!({
                "PENDING": 0,
                "SENT": 0,
                "FAILED": 0,
                "RETRYING": 0,
            })
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_counts_reflect_service_values() -> TestResult {
        let mut repo = strict_notifications_mock();

        repo.expect_counts_by_status()
            .once()
            .withf(|org| *org == TEST_ORG_UUID)
            .return_once(|_| {
                Ok(StatusCounts {
                    pending: 2,
                    sent: 7,
                    failed: 3,
                    retrying: 1,
                })
            });

        let body: StatusCountsResponse =
            TestClient::get("http://example.com/notifications/status-counts")
                .send(&make_service(repo))
                .await
                .take_json()
                .await?;

        assert_eq!(body.pending, 2);
        assert_eq!(body.sent, 7);
        assert_eq!(body.failed, 3);
        assert_eq!(body.retrying, 1);

        Ok(())
    }
}
